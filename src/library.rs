use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::Deserialize;
use serde_json::from_str;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// A passage bundled with the binary.
#[derive(Deserialize, Clone, Debug)]
pub struct LibraryPassage {
    pub name: String,
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// Names of every bundled passage, sorted.
pub fn names() -> Vec<String> {
    let mut names: Vec<String> = PASSAGE_DIR
        .files()
        .filter_map(|file| {
            let path = file.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(|stem| stem.to_string())
            } else {
                None
            }
        })
        .collect();
    names.sort();
    names
}

pub fn by_name(name: &str) -> Option<LibraryPassage> {
    let file = PASSAGE_DIR.get_file(format!("{name}.json"))?;

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret passage file as a string");

    Some(from_str(file_as_str).expect("Unable to deserialize passage json"))
}

pub fn random() -> LibraryPassage {
    let names = names();
    let name = names.choose(&mut thread_rng()).expect("Passage library is empty");
    by_name(name).expect("Passage file not found")
}
