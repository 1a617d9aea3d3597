use crate::core::{CustomerFields, Inputs, OutputFormat, RenderOptions, SaldoError};
use crate::report::Report;

/// Generate a saldo report from the four input workbooks and render it.
///
/// Returns the bytes of an XLSX workbook or a PDF document, depending on
/// [`RenderOptions::output_format`]. All inputs are validated before any
/// output is produced.
///
/// ```no_run
/// use saldo::core::{CustomerFieldsBuilder, Inputs, OutputFormat, RenderOptionsBuilder, Theme};
///
/// # fn run(template: &[u8], helper: &[u8], src1: &[u8], src2: &[u8]) -> Result<(), saldo::core::SaldoError> {
/// let customer = CustomerFieldsBuilder::new("Ján Novák", "1000123", "500012345").build();
/// let options = RenderOptionsBuilder::new(OutputFormat::Document)
///     .theme(Theme::Gray)
///     .build();
/// let pdf = saldo::render(&Inputs::new(template, helper, src1, src2), &customer, &options)?;
/// assert!(pdf.starts_with(b"%PDF"));
/// # Ok(())
/// # }
/// ```
pub fn render(
    inputs: &Inputs<'_>,
    customer: &CustomerFields,
    options: &RenderOptions,
) -> Result<Vec<u8>, SaldoError> {
    let report = Report::generate(inputs, customer, &options.config)?;
    let bytes = match options.output_format {
        #[cfg(feature = "xlsx")]
        OutputFormat::Workbook => crate::xlsx::to_xlsx(&report, options)?,
        #[cfg(feature = "pdf")]
        OutputFormat::Document => crate::pdf::to_pdf(&report, options)?,
        #[allow(unreachable_patterns)]
        other => return Err(SaldoError::Unsupported(other)),
    };
    log::info!(
        "rendered {} report for '{}': {} rows, {} bytes",
        options.output_format,
        customer.name,
        report.rows_written(),
        bytes.len()
    );
    Ok(bytes)
}
