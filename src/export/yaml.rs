//! YAML Export functionality
//!
//! Same payload as the JSON export, for human reading.

use crate::error::FiscallyResult;
use crate::export::json::AnalyticsExport;
use std::io::Write;

/// Write the export as YAML with a short header comment
pub fn export_yaml<W: Write>(export: &AnalyticsExport, writer: &mut W) -> FiscallyResult<()> {
    writeln!(writer, "# Fiscally Analytics Export")?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# Month: {}", export.dashboard.month)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, export)?;
    Ok(())
}
