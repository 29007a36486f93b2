//! Career stream catalog: the track a player picks before the first month.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// A selectable career track with a fixed monthly salary in coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub careers: Vec<String>,
    pub salary: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreamsList(pub Vec<Stream>);

fn stream(
    id: &str,
    name: &str,
    careers: &[&str],
    salary: u32,
    difficulty: Difficulty,
) -> Stream {
    Stream {
        id: id.to_string(),
        name: name.to_string(),
        careers: careers.iter().map(ToString::to_string).collect(),
        salary,
        difficulty,
    }
}

impl StreamsList {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// The shipped catalog of four streams.
    #[must_use]
    pub fn builtin() -> Self {
        Self(vec![
            stream(
                "science",
                "Science",
                &[
                    "Software Engineer",
                    "Mechanical Engineer",
                    "Data Analyst",
                    "Doctor (Intern)",
                ],
                3000,
                Difficulty::Medium,
            ),
            stream(
                "commerce",
                "Commerce",
                &[
                    "Accountant",
                    "Junior Finance Associate",
                    "Marketing Intern",
                    "Business Analyst",
                ],
                2200,
                Difficulty::Easy,
            ),
            stream(
                "arts",
                "Arts / Humanities",
                &[
                    "Graphic Designer",
                    "Content Creator",
                    "Media Assistant",
                    "Social Science Intern",
                ],
                1800,
                Difficulty::Easy,
            ),
            stream(
                "vocational",
                "Vocational / Skill-Based",
                &[
                    "Electrician Apprentice",
                    "Technician",
                    "Carpenter Assistant",
                    "Mobile Repair Trainee",
                ],
                2000,
                Difficulty::Easy,
            ),
        ])
    }

    /// Load a stream catalog from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid stream data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let streams: Vec<Stream> = serde_json::from_str(json)?;
        Ok(Self(streams))
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Stream> {
        self.0.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stream> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a StreamsList {
    type Item = &'a Stream;
    type IntoIter = std::slice::Iter<'a, Stream>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_expected_salaries() {
        let streams = StreamsList::builtin();
        assert_eq!(streams.len(), 4);
        assert_eq!(streams.get_by_id("science").unwrap().salary, 3000);
        assert_eq!(streams.get_by_id("commerce").unwrap().salary, 2200);
        assert_eq!(streams.get_by_id("arts").unwrap().salary, 1800);
        assert_eq!(streams.get_by_id("vocational").unwrap().salary, 2000);
        assert_eq!(
            streams.get_by_id("science").unwrap().difficulty,
            Difficulty::Medium
        );
    }

    #[test]
    fn stream_catalog_parses_from_json() {
        let json = r#"[
            {
                "id": "science",
                "name": "Science",
                "careers": ["Software Engineer"],
                "salary": 3000,
                "difficulty": "medium"
            },
            {
                "id": "arts",
                "name": "Arts",
                "salary": 1800
            }
        ]"#;

        let streams = StreamsList::from_json(json).unwrap();
        assert_eq!(streams.len(), 2);
        assert_eq!(streams.get_by_id("science").unwrap().salary, 3000);
        let arts = streams.get_by_id("arts").unwrap();
        assert!(arts.careers.is_empty());
        assert_eq!(arts.difficulty, Difficulty::Easy);
        assert!(streams.get_by_id("unknown").is_none());
    }

    #[test]
    fn difficulty_string_roundtrip() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
        }
        assert!("brutal".parse::<Difficulty>().is_err());
    }
}
