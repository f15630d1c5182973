//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::args::{FathomArgs, OutputFormat};
use crate::coordinator::{GenerationStats, SearchResponse};
use crate::error::Result;

/// Types that know how to print themselves for people.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl HumanOutput for SearchResponse {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.results.is_empty() {
            writeln!(out, "No results.")?;
        } else {
            writeln!(out, "Search Results:")?;
            writeln!(out, "═══════════════")?;
            for (i, result) in self.results.iter().enumerate() {
                writeln!(out)?;
                writeln!(out, "Result {}: (Score: {:.3})", i + 1, result.score)?;
                writeln!(out, "─────────────")?;
                writeln!(out, "title: {}", result.title)?;
                writeln!(out, "url: {}", result.url)?;
                if !result.preview.is_empty() {
                    writeln!(out, "preview: {}", result.preview)?;
                }
            }
        }

        if !self.spelling_corrections.is_empty() {
            writeln!(out)?;
            writeln!(out, "Did you mean:")?;
            for (term, correction) in &self.spelling_corrections {
                writeln!(out, "  {term} → {correction}")?;
            }
        }
        Ok(())
    }
}

impl HumanOutput for GenerationStats {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Index Statistics:")?;
        writeln!(out, "════════════════")?;
        writeln!(out, "Generation: {}", self.generation)?;
        writeln!(out, "Documents: {}", self.documents)?;
        writeln!(out, "Terms: {}", self.terms)?;
        writeln!(out, "Links: {}", self.links)?;
        writeln!(
            out,
            "Spelling: {}",
            if self.spelling_ready { "ready" } else { "pending" }
        )?;
        writeln!(out, "Built at: {}", self.built_at.to_rfc3339())
    }
}

/// Output a result in the selected format.
pub fn output_result<T>(message: &str, result: &T, args: &FathomArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)?;
    out.flush()?;
    Ok(())
}

/// Write a result in the selected format to `out`.
pub fn write_result<T>(out: &mut dyn Write, message: &str, result: &T, args: &FathomArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(out)?;
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::SearchResult;
    use clap::Parser;
    use std::collections::BTreeMap;

    fn response() -> SearchResponse {
        SearchResponse {
            results: vec![SearchResult {
                title: "Regex Guide".to_string(),
                preview: "Patterns".to_string(),
                url: "u/regex".to_string(),
                score: 0.909,
            }],
            spelling_corrections: BTreeMap::from([("regx".to_string(), "regex".to_string())]),
        }
    }

    fn render(argv: &[&str]) -> String {
        let args = FathomArgs::try_parse_from(argv).unwrap();
        let mut buffer = Vec::new();
        write_result(&mut buffer, "Search completed", &response(), &args).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_human_output() {
        let text = render(&["fathom", "serve"]);
        assert!(text.contains("Result 1: (Score: 0.909)"));
        assert!(text.contains("url: u/regex"));
        assert!(text.contains("regx → regex"));
        assert!(!text.contains("Search completed"));

        let verbose = render(&["fathom", "-vv", "serve"]);
        assert!(verbose.starts_with("Search completed"));
    }

    #[test]
    fn test_json_output() {
        let text = render(&["fathom", "--format", "json", "serve"]);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["results"][0]["title"], "Regex Guide");
        assert_eq!(value["spellingCorrections"]["regx"], "regex");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_empty_results() {
        let mut buffer = Vec::new();
        SearchResponse::default().write_human(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "No results.\n");
    }
}
