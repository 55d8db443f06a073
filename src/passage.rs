use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use cgisf_lib::cgisf;
use rand::Rng;
use strum_macros::Display;

use crate::document::split_units;
use crate::library;

/// Where the text for a round comes from.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum PassageSource {
    Inline(String),
    File(PathBuf),
    Generated { sentences: usize },
    Library(String),
    #[strum(serialize = "library")]
    RandomLibrary,
}

/// A resolved passage: a title for the record book and the normalized
/// content units the round is played against.
#[derive(Debug, Clone)]
pub struct Passage {
    pub title: String,
    pub units: Vec<String>,
    pub source: PassageSource,
}

impl PassageSource {
    /// Load and normalize the text for this source. Fails with
    /// `InvalidInput` when the text holds no playable content and
    /// `NotFound` when a named bundled passage does not exist.
    pub fn resolve(&self) -> io::Result<Passage> {
        match self {
            PassageSource::Inline(text) => build("custom text", text, self.clone()),
            PassageSource::File(path) => {
                let text = fs::read_to_string(path)?;
                let title = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("file");
                build(title, &text, self.clone())
            }
            PassageSource::Generated { sentences } => {
                let rng = &mut rand::thread_rng();
                let mut lines = Vec::new();
                for _ in 0..*sentences {
                    lines.push(cgisf(
                        rng.gen_range(1..3),
                        rng.gen_range(1..3),
                        rng.gen_range(1..5),
                        rng.gen_bool(0.5),
                        rng.gen_range(1..3),
                        rng.gen_bool(0.5),
                    ));
                }
                build("generated sentences", &lines.join("\n"), self.clone())
            }
            PassageSource::Library(name) => {
                let passage = library::by_name(name).ok_or_else(|| {
                    io::Error::new(
                        ErrorKind::NotFound,
                        format!(
                            "no bundled passage named '{}'; available: {}",
                            name,
                            library::names().join(", ")
                        ),
                    )
                })?;
                build(&passage.title, &passage.paragraphs.join("\n"), self.clone())
            }
            PassageSource::RandomLibrary => {
                let passage = library::random();
                build(&passage.title, &passage.paragraphs.join("\n"), self.clone())
            }
        }
    }
}

fn build(title: &str, text: &str, source: PassageSource) -> io::Result<Passage> {
    let units = split_units(text);
    if units.is_empty() {
        return Err(io::Error::new(ErrorKind::InvalidInput, "passage is empty"));
    }
    Ok(Passage {
        title: title.to_string(),
        units,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn inline_resolves_to_normalized_units() {
        let source = PassageSource::Inline("  The quick\n\n  brown   fox  ".into());
        let passage = source.resolve().unwrap();
        assert_eq!(passage.title, "custom text");
        assert_eq!(passage.units, vec!["The quick", "brown fox"]);
    }

    #[test]
    fn blank_inline_is_invalid_input() {
        let source = PassageSource::Inline("   \n\n\t  ".into());
        let err = source.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn file_resolves_with_its_stem_as_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fable.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "first paragraph").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "second paragraph").unwrap();

        let passage = PassageSource::File(path).resolve().unwrap();
        assert_eq!(passage.title, "fable");
        assert_eq!(passage.units, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn missing_file_propagates_not_found() {
        let source = PassageSource::File(PathBuf::from("/no/such/file.txt"));
        let err = source.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn generated_produces_one_unit_per_sentence() {
        let source = PassageSource::Generated { sentences: 3 };
        let passage = source.resolve().unwrap();
        assert_eq!(passage.units.len(), 3);
        assert!(passage.units.iter().all(|u| !u.is_empty()));
    }

    #[test]
    fn generated_zero_sentences_is_invalid_input() {
        let source = PassageSource::Generated { sentences: 0 };
        let err = source.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn library_resolves_by_name() {
        let passage = PassageSource::Library("tides".into()).resolve().unwrap();
        assert_eq!(passage.title, "On Tides");
        assert_eq!(passage.units.len(), 4);
    }

    #[test]
    fn unknown_library_name_lists_what_exists() {
        let err = PassageSource::Library("atlantis".into()).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("aesop-fox"));
    }

    #[test]
    fn random_library_resolves() {
        let passage = PassageSource::RandomLibrary.resolve().unwrap();
        assert!(!passage.units.is_empty());
    }

    #[test]
    fn source_kind_labels() {
        assert_eq!(PassageSource::Inline("x".into()).to_string(), "inline");
        assert_eq!(PassageSource::File("a.txt".into()).to_string(), "file");
        assert_eq!(
            PassageSource::Generated { sentences: 1 }.to_string(),
            "generated"
        );
        assert_eq!(PassageSource::Library("tides".into()).to_string(), "library");
        assert_eq!(PassageSource::RandomLibrary.to_string(), "library");
    }
}
