use std::path::Path;

use skillcheck_config::SkillcheckConfig;
use skillcheck_skills::Harness;

use crate::output;

pub(super) async fn cmd_triggers(
    root: &Path,
    config: &SkillcheckConfig,
    json: bool,
) -> skillcheck_core::Result<i32> {
    let harness = Harness::new(&config.harness);
    let report = skillcheck_skills::run_harness(root, config, harness).await?;

    if json {
        output::print_json(!report.has_errors(), &report)?;
    } else {
        println!("{}", output::render_harness(&report));
    }
    Ok(report.exit_code())
}
