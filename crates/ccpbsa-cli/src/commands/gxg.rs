use crate::cli::GxgArgs;
use crate::config::RunConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ccpbsa::core::config::flags::ToolFlags;
use ccpbsa::engine::config::RunSettingsBuilder;
use ccpbsa::engine::progress::ProgressReporter;
use ccpbsa::engine::runner::SystemRunner;
use ccpbsa::workflows::{self, PipelineContext};
use tracing::info;

pub fn run(args: GxgArgs) -> Result<()> {
    let mut config = RunConfig::from_file(&args.config)?;
    if let Some(output_dir) = args.output_dir {
        config.output_dir = Some(output_dir);
    }
    let flags = ToolFlags::load(&config.flags)?;

    // Tripeptides are always single-chain stability inputs, whatever mode
    // the run configuration declares.
    let settings = RunSettingsBuilder::new()
        .mode(ccpbsa::engine::config::RunMode::Stability)
        .minimization_mdp(config.files.minimization_mdp.clone())
        .singlepoint_mdp(config.files.singlepoint_mdp.clone())
        .interaction_table(config.files.interaction_table.clone())
        .pb_params(config.files.pb_params.clone())
        .build()?;

    info!("Generating the GXG tripeptide baseline");
    let runner = SystemRunner;
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let context = PipelineContext {
        runner: &runner,
        flags: &flags,
        settings: &settings,
        coefficients: config.coefficients,
        reporter: &reporter,
    };

    println!("Generating GXG baseline (20 tripeptides)...");
    let outcome = workflows::gxg::run(&context, &config.workspace_parent())?;
    println!(
        "Baseline written to {}",
        outcome.workspace_root.join(workflows::GXG_TABLE).display()
    );
    Ok(())
}
