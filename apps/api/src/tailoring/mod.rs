// Tailoring pipeline: bullet selection, region rules, prompt assembly,
// schema-constrained generation, then validation and grounding.
// All generation calls go through llm_client::TextGenerator.

pub mod bullet_selector;
pub mod prompts;
pub mod region_rules;
pub mod schema;
pub mod tailor;

#[cfg(test)]
pub mod test_support;
