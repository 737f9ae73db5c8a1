//! In-memory radio catalog browsed by the demo wizard.

use crate::flow::PickItem;

const RADIO_LINK_BASE: &str = "https://music.163.com/#/djradio?id=";
const PROGRAM_LINK_BASE: &str = "https://music.163.com/#/program?id=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: u64,
    pub name: String,
    pub duration_secs: u32,
}

impl Program {
    fn new(id: u64, name: &str, duration_secs: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            duration_secs,
        }
    }

    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }

    pub fn link(&self) -> String {
        format!("{}{}", PROGRAM_LINK_BASE, self.id)
    }
}

impl PickItem for Program {
    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radio {
    pub id: u64,
    pub name: String,
    pub host: String,
    pub category: String,
    pub programs: Vec<Program>,
}

impl Radio {
    pub fn link(&self) -> String {
        format!("{}{}", RADIO_LINK_BASE, self.id)
    }

    /// Programs whose name contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<Program> {
        let query = query.trim().to_lowercase();
        self.programs
            .iter()
            .filter(|p| query.is_empty() || p.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}

impl PickItem for Radio {
    fn label(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some(&self.host)
    }

    fn detail(&self) -> Option<&str> {
        Some(&self.category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub radios: Vec<Radio>,
}

impl Catalog {
    pub fn new(radios: Vec<Radio>) -> Self {
        Self { radios }
    }

    pub fn radio(&self, id: u64) -> Option<&Radio> {
        self.radios.iter().find(|r| r.id == id)
    }

    /// Small fixed catalog for the `radio` command
    pub fn sample() -> Self {
        Self::new(vec![
            Radio {
                id: 336355127,
                name: "Late Night Jazz".to_string(),
                host: "Mira Chen".to_string(),
                category: "Music".to_string(),
                programs: vec![
                    Program::new(2061034, "Blue Notes After Midnight", 2710),
                    Program::new(2061035, "Jazz for Rainy Streets", 3125),
                    Program::new(2061036, "Standards Revisited", 2488),
                    Program::new(2061037, "Smooth Jazz Hour", 3600),
                ],
            },
            Radio {
                id: 527341,
                name: "Tech Talk Weekly".to_string(),
                host: "Sam Ortiz".to_string(),
                category: "Technology".to_string(),
                programs: vec![
                    Program::new(3180001, "Compilers for Everyone", 2934),
                    Program::new(3180002, "The Async Episode", 3301),
                    Program::new(3180003, "Terminal User Interfaces", 2702),
                ],
            },
            Radio {
                id: 794102,
                name: "Story Hour".to_string(),
                host: "Ana Silva".to_string(),
                category: "Audiobooks".to_string(),
                programs: vec![
                    Program::new(4500101, "The Lighthouse, Part 1", 1820),
                    Program::new(4500102, "The Lighthouse, Part 2", 1904),
                ],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_ignores_case_and_whitespace() {
        let catalog = Catalog::sample();
        let radio = catalog.radio(336355127).unwrap();
        let names: Vec<String> = radio.search("  JAZZ ").into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Jazz for Rainy Streets", "Smooth Jazz Hour"]);
        assert_eq!(radio.search("").len(), radio.programs.len());
        assert!(radio.search("opera").is_empty());
    }

    #[test]
    fn test_links_and_labels() {
        let catalog = Catalog::sample();
        let radio = catalog.radio(527341).unwrap();
        assert_eq!(radio.link(), "https://music.163.com/#/djradio?id=527341");
        assert_eq!(
            radio.programs[0].link(),
            "https://music.163.com/#/program?id=3180001"
        );
        assert_eq!(radio.programs[0].duration_label(), "48:54");

        let entry = radio.to_entry();
        assert_eq!(entry.label, "Tech Talk Weekly");
        assert_eq!(entry.description.as_deref(), Some("Sam Ortiz"));
        assert_eq!(entry.detail.as_deref(), Some("Technology"));
    }
}
