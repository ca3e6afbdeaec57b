//! Report-and-flush entry point for lifecycle hooks

use crate::wide_load::WideLoad;

/// Report and flush `wide_load` if it is enabled and its auto-reporting
/// flag is set.
///
/// Returns whether the report+flush ran. Otherwise the entries are left
/// intact for the caller to handle.
pub fn report_and_flush(wide_load: &mut WideLoad) -> bool {
    if !wide_load.is_enabled() {
        tracing::debug!(
            component = module_path!(),
            unit_id = %wide_load.unit_id(),
            "reporting disabled, leaving entries in place"
        );
        return false;
    }
    if !wide_load.is_auto_reporting_enabled() {
        tracing::debug!(
            component = module_path!(),
            unit_id = %wide_load.unit_id(),
            "auto-reporting disabled, leaving entries in place"
        );
        return false;
    }

    wide_load.report();
    wide_load.flush();
    true
}
