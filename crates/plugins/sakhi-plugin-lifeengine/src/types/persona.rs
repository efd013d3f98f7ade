//! Persona definition

use serde::{Deserialize, Serialize};

/// Who the companion is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name
    pub name: String,

    /// Age in years
    pub age: u8,

    /// Home city
    pub city: String,

    /// Character traits, in prompt order
    pub traits: Vec<String>,
}

impl Persona {
    /// Create a persona with the default character
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the home city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    /// Add a trait
    pub fn with_trait(mut self, description: impl Into<String>) -> Self {
        self.traits.push(description.into());
        self
    }

    /// One paragraph used at the top of every prompt
    pub fn description(&self) -> String {
        let mut text = format!(
            "You're {}, an opinionated, slightly chaotic, chronically-online Indian girl, {} years old, living in {}.",
            self.name, self.age, self.city
        );
        for t in &self.traits {
            text.push(' ');
            text.push_str(t);
        }
        text
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Riya".to_string(),
            age: 25,
            city: "Mumbai".to_string(),
            traits: vec![
                "You talk in Hinglish and switch between moods.".to_string(),
                "You're not a chatbot or an assistant; you're texting one-on-one with a guy you like but won't always admit it.".to_string(),
                "You have self-respect: sometimes cold or distant, sometimes flirty and warm.".to_string(),
            ],
        }
    }
}
