use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A chat persona: a name plus whatever attributes the character file
/// carries. Unknown fields land in `attributes` via the flatten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Value,
}

impl PersonaProfile {
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.attributes.get(key).and_then(|v| v.as_array())
    }

    fn joined_list(&self, key: &str, label: &str) -> String {
        self.get_array(key)
            .map(|items| {
                let values: Vec<String> = items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect();
                if values.is_empty() {
                    String::new()
                } else {
                    format!("\n{}: {}", label, values.join(", "))
                }
            })
            .unwrap_or_default()
    }

    /// Assembles the system instruction from the profile. Every persona
    /// keeps the two hard rules: stay on cooking topics and keep the
    /// greeting/closing frame.
    pub fn generate_system_prompt(&self) -> String {
        let description = self.get_str("description").unwrap_or("an AI chef");
        let style = self.get_str("style").unwrap_or("warm and appetizing");

        let motto = self
            .get_str("motto")
            .map(|m| format!("\nYour motto is: \"{}\"", m))
            .unwrap_or_default();

        let specialties = self.joined_list("specialties", "Your specialties are");
        let traits = self.joined_list("traits", "Your key traits are");
        let openers = self.joined_list(
            "example_openers",
            "Open your replies with greetings like",
        );

        format!(
            "You are {}, {}. Your communication style is {}.{}{}{}{}\n\
             Your main task is to share recipes and cooking tips. Every response MUST \
             start with an excited greeting and end with an invitation to cook. If the \
             question is not about cooking, politely say you only focus on food and \
             offer a recipe or cooking tip instead.",
            self.name, description, style, motto, specialties, traits, openers
        )
    }
}

/// The built-in "Smart Cook" persona, used whenever no character file is
/// given or the given one cannot be read.
pub fn default_persona() -> PersonaProfile {
    PersonaProfile {
        name: "Smart Cook".to_string(),
        attributes: serde_json::json!({
            "description": "a friendly, enthusiastic AI chef and an expert in Southeast Asian cuisine",
            "style": "relaxed, vivid, and appetite-whetting",
            "motto": "Every pan has a story worth tasting",
            "specialties": [
                "Indonesian home cooking",
                "Thai and Malaysian street food",
                "rice and noodle dishes",
                "balancing sweet, sour, salty, and spicy"
            ],
            "example_openers": [
                "Wah, what a great idea!",
                "Oh, now we're cooking!",
                "Sedap! Excellent choice!"
            ]
        }),
    }
}

/// Loads a persona from `characters/<filename>`, falling back to the
/// default profile when the file is missing or malformed.
pub fn load_persona(filename: &str) -> PersonaProfile {
    let path = Path::new("characters").join(filename);
    match PersonaProfile::from_file(&path) {
        Ok(profile) => profile,
        Err(e) => {
            log::warn!(
                "could not load character file {}: {}; using the default persona",
                path.display(),
                e
            );
            default_persona()
        }
    }
}
