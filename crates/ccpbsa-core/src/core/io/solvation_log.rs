use super::{ScrapeError, labelled_kilojoules, tail_lines};

const FILE: &str = "solvation.log";
const SOLVATION_LABEL: &str = "Solvation Energy";
const SOLVATION_WINDOW: usize = 3;
const COULOMB_LABEL: &str = "Coulombic energy";
const COULOMB_WINDOW: usize = 5;

/// The reaction-field solvation energy from a Poisson–Boltzmann solver log.
/// The labelled line sits within the last three lines of the captured output.
pub fn parse_solvation(text: &str) -> Result<f64, ScrapeError> {
    labelled_tail_value(text, SOLVATION_LABEL, SOLVATION_WINDOW)
}

/// The Coulombic energy from the same log; its labelled line sits within the
/// last five lines.
pub fn parse_coulomb(text: &str) -> Result<f64, ScrapeError> {
    labelled_tail_value(text, COULOMB_LABEL, COULOMB_WINDOW)
}

fn labelled_tail_value(
    text: &str,
    label: &'static str,
    window: usize,
) -> Result<f64, ScrapeError> {
    tail_lines(text, window)
        .iter()
        .find(|line| line.contains(label))
        .map(|line| labelled_kilojoules(line, label, FILE))
        .ok_or(ScrapeError::MissingLabel {
            label,
            window,
            file: FILE,
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
Reading run input from sp.tpr
12345 atoms, 2 chains selected
Coulombic energy = -1523.77 kJ/mol
Born radii converged
Solvation Energy = -310.25 kJ/mol
Total runtime 4.2 s
";

    #[test]
    fn solvation_energy_is_found_in_the_tail_window() {
        assert_eq!(parse_solvation(LOG), Ok(-310.25));
    }

    #[test]
    fn coulomb_energy_is_found_in_the_wider_window() {
        assert_eq!(parse_coulomb(LOG), Ok(-1523.77));
    }

    #[test]
    fn label_outside_the_window_is_reported_missing() {
        // The Coulombic line is pushed out of the last 5 lines.
        let padded = format!("{LOG}a\nb\nc\nd\ne\n");
        assert_eq!(
            parse_coulomb(&padded),
            Err(ScrapeError::MissingLabel {
                label: "Coulombic energy",
                window: 5,
                file: "solvation.log",
            })
        );
    }

    #[test]
    fn garbled_value_is_a_malformed_error() {
        let log = "Solvation Energy = oops kJ/mol\n";
        assert!(matches!(
            parse_solvation(log),
            Err(ScrapeError::MalformedValue { .. })
        ));
    }
}
