//! The `gradekit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create example assessment bundle
    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BUNDLE)?;
        println!("Created assessments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit assessments/example.toml with your own reference and submissions");
    println!("  2. Run: gradekit validate --bundle assessments/example.toml");
    println!("  3. Run: gradekit grade --bundle assessments/example.toml");
    println!("  4. Run: gradekit screen --bundle assessments/example.toml");

    Ok(())
}

const EXAMPLE_BUNDLE: &str = r#"[assessment]
id = "example"
title = "Example Assessment"
description = "A simple example assessment to get started"

[assessment.settings]
enable_plagiarism_check = true
similarity_threshold = 30.0
cosine_similarity_threshold = 0.7
ignore_quotes = true
ignore_references = true

[reference]
model_answer = """
Normalization is a database design technique that reduces data redundancy
and improves data integrity by organising tables into progressively
stricter normal forms.
"""
keywords = [
    "normalization",
    "redundancy",
    { text = "data integrity" },
    { text = "normal forms" },
]
max_mark = 10.0
word_limit = 500

[[submissions]]
id = "s-1"
author = "John Doe"
question_id = "q-1"
text = """
Normalization organises a database into normal forms so that each fact is
stored exactly once. This reduces redundancy and protects data integrity
when rows are updated or deleted.
"""

[[submissions]]
id = "s-2"
author = "Jane Smith"
question_id = "q-1"
text = """
Databases are normalised to remove duplicate information. Splitting wide
tables into narrower related tables avoids update anomalies.
"""

[[submissions]]
id = "s-3"
author = "Alex Chen"
question_id = "q-1"
text = """
Normalization organises a database into normal forms so that each fact is
stored exactly once. It reduces redundancy and protects integrity during
updates.
"""
"#;
