//! The `rubricate init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("rubricate.toml").exists() {
        println!("rubricate.toml already exists, skipping.");
    } else {
        std::fs::write("rubricate.toml", SAMPLE_CONFIG)?;
        println!("Created rubricate.toml");
    }

    std::fs::create_dir_all("data")?;
    let sample = Path::new("data/sample_questions.json");
    if sample.exists() {
        println!("data/sample_questions.json already exists, skipping.");
    } else {
        std::fs::write(sample, SAMPLE_DATASET)?;
        println!("Created data/sample_questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Point `dataset` in rubricate.toml at your questions");
    println!("  2. Run: rubricate validate");
    println!("  3. Run: rubricate start --subject ALL --locale BOTH --evaluator \"Your Name\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# rubricate configuration

# question (single questions, max 6) or list (whole lists, max 17),
# or the name of a custom variant below
variant = "question"

# path or http(s) URL; CSV or JSON
dataset = "data/sample_questions.json"

# optional rubric document shown by `rubricate criteria`
# criteria_doc = "https://example.org/criteria.md"

state_dir = "./.rubricate"
export_dir = "./exports"

# A custom variant:
#
# [variants.quick]
# max_score = 4
# layout = "map"
# id_column = "question_id"
#
# [[variants.quick.gates]]
# key = "factual_correctness"
# label = "Factual Correctness Check"
#
# [[variants.quick.quality]]
# key = "clarity"
# label = "Clarity"
#
# [[variants.quick.quality]]
# key = "distractors"
# label = "Distractor Quality"
# applies_to = "mcq"
"#;

const SAMPLE_DATASET: &str = r#"{
  "request_context": { "locale": "en_US" },
  "questions": [
    {
      "question_id": "1",
      "statement": "What is the value of {{MATH}}3 \\times 4{{/MATH}}?",
      "solution": "Multiplying 3 by 4 gives 12.",
      "type": "MULTIPLE_CHOICE",
      "answer": "12",
      "incorrect_alternatives": ["7", "34", "1"],
      "request_context": { "discipline": "Mathematics", "grade": "30", "difficulty": "150" }
    },
    {
      "question_id": "2",
      "statement": "Explain why the Moon shows phases.",
      "solution": "Half of the Moon is always lit by the Sun; as it orbits Earth we see a changing portion of the lit half.",
      "type": "DISCURSIVE",
      "request_context": { "discipline": "Science", "grade": "50", "difficulty": "450" }
    },
    {
      "question_id": "3",
      "statement": "Qual é a capital do Brasil?",
      "type": "MULTIPLE_CHOICE",
      "answer": "Brasília",
      "incorrect_alternatives": ["Rio de Janeiro", "São Paulo", "Salvador"],
      "request_context": { "discipline": "Geografia", "grade": "40", "locale": "pt_BR" }
    }
  ]
}
"#;
