//! `storefront query`

use storefront_runtime::RequestProcessor;

use crate::context::ProjectContext;
use crate::error::Result;

/// Run the query command
pub fn run_query(ctx: &ProjectContext, query: &str, strip: &[String]) -> Result<()> {
    let processor = RequestProcessor::new(
        ctx.config
            .ssr
            .strip_parameters
            .iter()
            .chain(strip)
            .cloned(),
    );
    let query = query.strip_prefix('?').unwrap_or(query);
    let processed = processor.process("", Some(query));
    println!("{}", processed.query);
    Ok(())
}
