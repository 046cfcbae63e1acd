//! Combines readers of several domains into one series.
//!
//! Domains are ordered most preferred first. The first domain that returns
//! data seeds the result; later domains only fill timesteps that are still
//! missing. There is no blending between domains.

use weather_common::TimeRange;

use crate::catalog::Era5HourlyVariable;
use crate::error::{ReaderError, Result};
use crate::reader::Era5Reader;
use crate::types::ValueSeries;

/// Ordered set of readers for one location.
#[derive(Debug)]
pub struct Era5Mixer {
    readers: Vec<Era5Reader>,
}

impl Era5Mixer {
    /// Create a mixer from readers in preference order.
    pub fn new(readers: Vec<Era5Reader>) -> Self {
        Self { readers }
    }

    /// Prefetch `variable` on every reader.
    ///
    /// Readers skip raw inputs their domain does not carry.
    pub fn prefetch(&self, variable: Era5HourlyVariable, time: &TimeRange) {
        for reader in &self.readers {
            reader.prefetch(variable, time);
        }
    }

    /// Read `variable`, falling back to later domains for missing timesteps.
    pub async fn get(&self, variable: Era5HourlyVariable, time: &TimeRange) -> Result<ValueSeries> {
        let mut mixed: Option<ValueSeries> = None;
        let mut last_error = None;

        for reader in &self.readers {
            let series = match reader.get(variable, time).await {
                Ok(series) => series,
                Err(e) if e.is_recoverable() => {
                    tracing::debug!(
                        domain = %reader.domain(),
                        variable = %variable,
                        error = %e,
                        "Domain has no data, trying next"
                    );
                    last_error = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let complete = match mixed.as_mut() {
                None => {
                    let complete = !series.has_missing();
                    mixed = Some(series);
                    complete
                }
                Some(current) => {
                    let filled = current.fill_missing_from(&series)?;
                    tracing::debug!(
                        domain = %reader.domain(),
                        variable = %variable,
                        filled,
                        "Filled missing timesteps"
                    );
                    !current.has_missing()
                }
            };
            if complete {
                break;
            }
        }

        let Some(mixed) = mixed else {
            let reason = match last_error {
                Some(e) => format!("no domain has data ({})", e),
                None => "no domains configured".to_string(),
            };
            return Err(ReaderError::not_found(variable, reason));
        };

        if let Some(index) = mixed.first_missing() {
            return Err(ReaderError::not_found(
                variable,
                format!("no domain covers {}", time.time_at(index).to_rfc3339()),
            ));
        }
        Ok(mixed)
    }
}
