//! Numbered version picker for the interactive mode.

use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};

use crate::core::HelmSwitchError;

/// Prints `versions` as a numbered list and reads a choice from `input`.
///
/// A choice is either the 1-based index or one of the listed versions
/// verbatim. Anything else reprompts. End of input cancels the selection.
/// Versions contained in `recent` are tagged in the listing.
pub fn select_version<R: BufRead, W: Write>(
    versions: &[String],
    recent: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    if versions.is_empty() {
        return Err(HelmSwitchError::EmptyVersionList.into());
    }

    writeln!(output, "{}", "Select helm version:".bold())?;
    let width = versions.len().to_string().len();
    for (i, version) in versions.iter().enumerate() {
        if recent.contains(version) {
            writeln!(output, "  {:>width$}) {version} {}", i + 1, "(recent)".dimmed())?;
        } else {
            writeln!(output, "  {:>width$}) {version}", i + 1)?;
        }
    }

    let mut line = String::new();
    loop {
        write!(output, "Enter number or version [1-{}]: ", versions.len())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Err(HelmSwitchError::SelectionCancelled.into());
        }

        if let Some(choice) = parse_choice(line.trim(), versions) {
            return Ok(choice.to_string());
        }
        writeln!(output, "{}", format!("Invalid selection: {}", line.trim()).yellow())?;
    }
}

fn parse_choice<'a>(answer: &str, versions: &'a [String]) -> Option<&'a str> {
    if answer.is_empty() {
        return None;
    }
    if let Ok(index) = answer.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| versions.get(i)).map(String::as_str);
    }
    versions.iter().find(|v| *v == answer).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn versions() -> Vec<String> {
        vec!["3.14.0".to_string(), "3.13.3".to_string(), "3.12.1".to_string()]
    }

    fn select(input: &str) -> (Result<String>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = select_version(&versions(), &["3.13.3".to_string()], &mut reader, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_select_by_number() {
        let (result, output) = select("2\n");
        assert_eq!(result.unwrap(), "3.13.3");
        assert!(output.contains("1) 3.14.0"));
        assert!(output.contains("(recent)"));
    }

    #[test]
    fn test_select_by_literal_version() {
        let (result, _) = select("3.12.1\n");
        assert_eq!(result.unwrap(), "3.12.1");
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let (result, output) = select("0\n9\nlatest\n\n1\n");
        assert_eq!(result.unwrap(), "3.14.0");
        assert_eq!(output.matches("Invalid selection").count(), 4);
    }

    #[test]
    fn test_eof_cancels() {
        let (result, _) = select("banana\n");
        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<HelmSwitchError>(),
            Some(&HelmSwitchError::SelectionCancelled)
        );
    }

    #[test]
    fn test_empty_list() {
        let mut reader = Cursor::new(Vec::new());
        let err = select_version(&[], &[], &mut reader, &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<HelmSwitchError>(),
            Some(&HelmSwitchError::EmptyVersionList)
        );
    }
}
