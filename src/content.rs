//! Static testimonial records shown in the carousel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
    pub content: String,
    pub rating: u8,
}

impl Testimonial {
    /// Uppercased first letter of each word of the name, e.g. "Léa Martin" -> "LM".
    pub fn avatar(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// "role · company", or just the role.
    pub fn byline(&self) -> String {
        match self.company.as_deref().filter(|c| !c.is_empty()) {
            Some(company) => format!("{} · {}", self.role, company),
            None => self.role.clone(),
        }
    }
}

const TESTIMONIALS: &[(&str, &str, Option<&str>, &str)] = &[
    (
        "Léa Martin",
        "Product Designer",
        Some("Studio Nord"),
        "Shift+Space and my list is there. I stopped keeping a notes app open all day.",
    ),
    (
        "Thomas Dubois",
        "Backend Developer",
        None,
        "It never gets in the way. I jot a task mid-build and I'm back in the terminal in a second.",
    ),
    (
        "Amina Diallo",
        "Freelance Writer",
        None,
        "The overlay is the first to-do app I actually keep using after the first week.",
    ),
    (
        "Carlos Ruiz",
        "Engineering Manager",
        Some("Brightwave"),
        "Light, fast and it works the same on my Mac at work and my Linux box at home.",
    ),
    (
        "Sophie Laurent",
        "PhD Student",
        None,
        "I capture ideas during lectures without leaving my slides. Exactly what I needed.",
    ),
    (
        "Kenji Tanaka",
        "Indie Game Developer",
        None,
        "Open source, no account, no sync drama. It just opens instantly.",
    ),
    (
        "Nora Haddad",
        "Marketing Lead",
        Some("Lumen"),
        "My whole team switched after seeing me use it in a screen share.",
    ),
    (
        "Julien Moreau",
        "Data Analyst",
        None,
        "Keyboard-first done right. I haven't touched the mouse to manage tasks in weeks.",
    ),
];

/// The eight testimonials of the landing page, all rated five stars.
pub fn testimonials() -> Vec<Testimonial> {
    TESTIMONIALS
        .iter()
        .map(|(name, role, company, content)| Testimonial {
            name: name.to_string(),
            role: role.to_string(),
            company: company.map(str::to_string),
            content: content.to_string(),
            rating: 5,
        })
        .collect()
}
