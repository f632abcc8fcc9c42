//! One-shot prediction: same validation and notices as the form.

use crate::error::{CliError, Result};
use crate::output;
use crimerisk::artifacts::ArtifactStore;
use crimerisk::form::{FormState, Notice};
use tracing::info;

/// Run the predict command
pub(crate) fn run(
    store: &ArtifactStore,
    location: &str,
    district: &str,
    year: i32,
) -> Result<()> {
    let context = store.context()?;
    let mut form = FormState::new(context);
    form.select_location(location)?;
    form.select_district(district)?;
    form.set_year(year)?;

    let notice = form.submit().clone();
    info!(location, district, year, notice = ?notice, "predict.done");

    output::section("Crime Risk");
    output::kv("Location", location);
    output::kv("District", district);
    output::kv("Year", year);
    println!();
    output::notice(&notice);

    match notice {
        Notice::Error(description) => Err(CliError::Prediction(description)),
        Notice::HighRisk | Notice::LowRisk => Ok(()),
    }
}
