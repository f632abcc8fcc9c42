//! Lists the choices the form offers.

use crate::error::{CliError, Result};
use crate::output;
use crimerisk::artifacts::ArtifactStore;

/// Run the options command
///
/// Without a location, lists every location with its district count.
/// With one, lists that location's districts.
pub(crate) fn run(store: &ArtifactStore, location: Option<&str>) -> Result<()> {
    let context = store.context()?;
    let options = context.options();

    let Some(location) = location else {
        output::section("Locations");
        for (location, districts) in options.iter() {
            output::kv(location, format!("{} districts", districts.len()));
        }
        if options.n_locations() == 0 {
            output::warning("dataset offers no locations");
        }
        return Ok(());
    };

    let districts = options.districts_for(location);
    if districts.is_empty() {
        return Err(CliError::InvalidSelection(format!(
            "'{location}' is not a listed location"
        )));
    }
    output::section(&format!("Districts of {location}"));
    for district in districts {
        output::item(district);
    }
    Ok(())
}
