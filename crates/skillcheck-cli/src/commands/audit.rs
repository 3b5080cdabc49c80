use std::path::Path;

use skillcheck_config::SkillcheckConfig;
use skillcheck_core::RunReport;

use crate::output;

pub(super) async fn cmd_audit(
    root: &Path,
    config: &SkillcheckConfig,
    json: bool,
) -> skillcheck_core::Result<i32> {
    let report = skillcheck_skills::run_audit(root, config).await?;
    emit(&report, json)?;
    Ok(report.exit_code())
}

pub(super) fn emit(report: &RunReport, json: bool) -> skillcheck_core::Result<()> {
    if json {
        output::print_json(!report.has_errors(), report)
    } else {
        println!("{}", output::render_audit(report));
        Ok(())
    }
}
