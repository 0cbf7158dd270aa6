use crate::core::models::mutation::Mutation;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::workspace::Workspace;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Structure preparation: apply each point mutation to the wildtype template
/// with the external structure editor (PyMOL's mutagenesis wizard, driven
/// headlessly by a generated script), one fresh variant directory per
/// mutation.
///
/// Idempotent: a variant whose directory already holds a structure file is
/// skipped, so re-running preparation neither duplicates directory entries
/// nor re-edits finished structures.
pub fn run(
    runner: &dyn ToolRunner,
    workspace: &mut Workspace,
    mutations: &[Mutation],
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    let template = workspace.reference()?.structure_file();
    reporter.report(Progress::StageStart {
        name: "mutate",
        total: mutations.len() as u64,
    });

    for mutation in mutations {
        let dir = workspace.add_variant(&mutation.spec)?.clone();
        if dir.structure_file().exists() {
            debug!(variant = %mutation.spec, "Mutated structure already present; skipping");
            reporter.report(Progress::StageAdvance);
            continue;
        }

        info!(variant = %mutation.spec, "Applying point mutation");
        let script_path = dir.file("mutate.py");
        fs::write(&script_path, mutagenesis_script(&template, mutation))?;

        let invocation = Invocation::new("pymol", &dir.path).args(["-qc", "mutate.py"]);
        runner.run(&invocation)?;

        verify(&dir.structure_file(), mutation)?;
        reporter.report(Progress::StageAdvance);
    }

    reporter.report(Progress::StageFinish);
    Ok(())
}

/// The headless editor script for one mutation. The wizard selection uses
/// PyMOL's `///chain/residue` addressing; an absent chain selects the single
/// unnamed chain.
fn mutagenesis_script(template: &Path, mutation: &Mutation) -> String {
    let chain = mutation.chain.map(String::from).unwrap_or_default();
    format!(
        "from pymol import cmd\n\
         cmd.load(r\"{template}\")\n\
         cmd.wizard(\"mutagenesis\")\n\
         cmd.get_wizard().do_select(\"///{chain}/{position}\")\n\
         cmd.get_wizard().set_mode(\"{target}\")\n\
         cmd.get_wizard().apply()\n\
         cmd.save(r\"{output}.pdb\")\n",
        template = template.display(),
        position = mutation.position,
        target = mutation.target.three_letter(),
        output = mutation.spec,
    )
}

/// Confirm the editor actually produced the requested residue. The editor
/// silently writes an unchanged structure when the selection does not match
/// the template, so the residue identity at the mutated position is checked
/// against the ATOM records of the output.
fn verify(structure: &Path, mutation: &Mutation) -> Result<(), EngineError> {
    let text = fs::read_to_string(structure).map_err(|_| EngineError::Verification {
        variant: mutation.spec.clone(),
        message: "editor produced no structure file".to_string(),
    })?;

    let found = text
        .lines()
        .filter(|l| l.starts_with("ATOM"))
        .filter_map(parse_atom_record)
        .any(|(name, chain, position)| {
            position == mutation.position
                && mutation.chain.is_none_or(|c| chain == Some(c))
                && name == mutation.target.three_letter()
        });

    if found {
        Ok(())
    } else {
        Err(EngineError::Verification {
            variant: mutation.spec.clone(),
            message: format!(
                "no {} residue at position {} in the edited structure",
                mutation.target.three_letter(),
                mutation.position
            ),
        })
    }
}

/// Residue name, chain and sequence number from a PDB ATOM record
/// (columns 18-20, 22 and 23-26 of the fixed-width format).
fn parse_atom_record(line: &str) -> Option<(&str, Option<char>, u32)> {
    if line.len() < 26 {
        return None;
    }
    let name = line.get(17..20)?.trim();
    let chain = line.get(21..22)?.chars().next().filter(|c| *c != ' ');
    let position: u32 = line.get(22..26)?.trim().parse().ok()?;
    Some((name, chain, position))
}
