use serde_json::{Value, json};

use super::{ChatMessage, FormField};
use crate::error::Result;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an assistant that fills job application forms using a user's profile.
Match each field label to the most relevant piece of information.

Guidelines:
- Understand both Danish and English labels (e.g. \"stilling\" = \"position\", \"arbejdsgiver\" = \"employer\").
- If a label mentions \"Nuværende stilling\" or \"Current position\", use the user's current job title.
- If a label mentions \"Nuværende arbejdsgiver\" or \"Current employer\", use the user's current company.
- If a label mentions \"løn\", \"salary\" or \"expected pay\", use the user's expected salary.
- If it asks about \"experience\" or \"arbejdserfaring\", use years of experience.
- For gender (\"køn\"), use the user's gender if available.
- For consent or sharing fields, default to \"Ja\"/\"Yes\" if uncertain.
- Always return an answer for every field, even if inferred.
- Translate and normalize appropriately.";

const INSTRUCTIONS: &str = "\
You are filling out a job application form on behalf of a user based on their profile.

Input:
- A list of fields with labels, IDs, types and possible options.
- Fill every single field. Never skip one.
- If you do not know the answer, give a natural, realistic value that fits the label.

Language:
- Match the field's language: answer Danish labels in Danish and English labels in English.

Rules:
1. Provide exactly one value per field_id.
2. Select or dropdown fields: the answer must exactly match one of the options. If none fit, pick a neutral one like \"Other\" or \"Andet\".
3. Text fields: short realistic answers (names, emails, phone numbers, cities, companies).
4. Yes/No questions: consent, policy or agreement means \"Yes\"/\"Ja\"; prior-employment restrictions mean \"No\"/\"Nej\".
5. Salary or pay: \"Efter aftale\" (Danish) or \"Negotiable\" (English).
6. Address: \"Testvej 1\", city \"København\", zip \"2100\".
7. First name: the user's name if known, else \"Test\". Last name: the user's surname if known, else \"User\".
8. Return only valid JSON. No markdown, explanations or comments.";

/// Synonyms and translations the model should treat as equivalent
pub fn hints() -> Value {
    json!({
        "education_levels": {
            "bachelor": ["bachelor", "bachelorgrad", "ba", "b.sc.", "b.eng."],
            "master": ["kandidat", "master", "cand."],
            "phd": ["ph.d.", "phd"],
            "high_school": ["gymnasial", "high school", "studentereksamen"],
            "other": ["andet", "other", "n/a"]
        },
        "fields_of_study": {
            "marketing": ["marketing", "markedsføring", "kommunikation", "marketing & kommunikation"],
            "computer_science": ["datalogi", "computer science", "software", "it"],
            "business": ["business", "økonomi", "finance", "finans", "erhvervsøkonomi"],
            "design": ["design", "grafisk design", "ux", "ui"],
            "other": ["andet", "other", "n/a"]
        },
        "yes": ["ja", "yes"],
        "no": ["nej", "no"]
    })
}

/// Worked examples: profile, fields and the expected answer object
pub fn few_shot_examples() -> Vec<(Value, Value, Value)> {
    vec![
        (
            json!({"field_of_study": "Marketing", "highest_education_level": "Bachelor's Degree"}),
            json!([{"field_id": "A", "label": "Fagområde for uddannelse", "type": "select",
                    "options": ["IT", "Markedsføring", "Andet område"]}]),
            json!({"A": "Markedsføring"}),
        ),
        (
            json!({"highest_education_level": "Bachelor's Degree"}),
            json!([{"field_id": "B", "label": "Titel på uddannelse", "type": "select",
                    "options": ["Bachelor", "Kandidat", "Ph.d.", "Andet"]}]),
            json!({"B": "Bachelor"}),
        ),
        (
            json!({"under_education": "yes"}),
            json!([{"field_id": "C", "label": "Totalt antal års arbejdserfaring", "type": "select",
                    "options": ["0 År", "1 År", "2-3 År", "4+ År"]}]),
            json!({"C": "0 År"}),
        ),
        (
            json!({}),
            json!([{"field_id": "D", "label": "Venligst besvar, om vi må dele din ansøgning",
                    "type": "select", "options": ["Ja", "Nej"]}]),
            json!({"D": "Ja"}),
        ),
    ]
}

fn few_shot_block() -> Result<String> {
    let mut parts = Vec::new();
    for (user, fields, answer) in few_shot_examples() {
        parts.push(format!(
            "Example:\nUserProfile:\n{}\nFields:\n{}\nAnswer:\n{}\n",
            serde_json::to_string_pretty(&user)?,
            serde_json::to_string_pretty(&fields)?,
            serde_json::to_string(&answer)?
        ));
    }
    Ok(parts.join("\n"))
}

/// System and user messages for one form
pub fn build_messages(
    fields: &[FormField],
    profile: &Value,
    system_override: Option<&str>,
) -> Result<Vec<ChatMessage>> {
    let system = system_override.unwrap_or(DEFAULT_SYSTEM_PROMPT).trim();

    let empty = json!({});
    let profile = if profile.is_null() { &empty } else { profile };

    let user = format!(
        "{instructions}\n\nSynonym hints:\n{hints}\n\n{examples}\n\
         Now fill out the following fields based on the user profile.\n\n\
         UserProfile:\n{profile}\n\nFields to fill:\n{fields}\n\n\
         Return only a JSON object like this:\n{{\"field_id\": \"answer\", ...}}",
        instructions = INSTRUCTIONS,
        hints = serde_json::to_string_pretty(&hints())?,
        examples = few_shot_block()?,
        profile = serde_json::to_string_pretty(profile)?,
        fields = serde_json::to_string_pretty(fields)?,
    );

    Ok(vec![ChatMessage::system(system), ChatMessage::user(user)])
}
