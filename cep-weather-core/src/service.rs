use tracing::{debug, error, info, instrument, warn};

use crate::{PostalCode, Temperature, WeatherError, provider::WeatherLookup};

/// Resolve `cep` to a city, then the city to its current temperature.
///
/// `cep` is the raw query parameter; `None` is treated like a malformed value.
/// The two upstream calls run sequentially since the second needs the city.
#[instrument(skip(lookup))]
pub async fn current_temperature(
    lookup: &dyn WeatherLookup,
    cep: Option<&str>,
) -> Result<Temperature, WeatherError> {
    let cep = match cep.map(PostalCode::parse) {
        Some(Ok(cep)) => cep,
        Some(Err(err)) => {
            debug!(error = %err, "rejecting request");
            return Err(WeatherError::InvalidZipcode);
        }
        None => {
            debug!("rejecting request without cep");
            return Err(WeatherError::InvalidZipcode);
        }
    };

    let city = lookup.resolve_city(&cep).await.map_err(|err| {
        warn!(error = %err, "city lookup failed");
        WeatherError::ZipcodeNotFound(err)
    })?;

    let celsius = lookup.resolve_temperature(&city).await.map_err(|err| {
        // Still reported to the client as a missing temperature.
        if err.is_configuration() {
            error!(error = %err, "temperature lookup is misconfigured");
        } else {
            warn!(%city, error = %err, "temperature lookup failed");
        }
        WeatherError::TemperatureNotFound(err)
    })?;

    let temperature = Temperature::from_celsius(celsius);
    info!(%city, temp_c = temperature.celsius, "resolved temperature");
    Ok(temperature)
}
