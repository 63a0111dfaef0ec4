//! Prompt templates per commit message format.

/// Placeholder replaced by the diff text.
const DIFF_PLACEHOLDER: &str = "{diff}";

const CONVENTIONAL: &str = "Generate a commit message following the Conventional Commits format:
<type>(<scope>): <short summary>

[optional body]

[optional footer]

Rules:
1. First line must be 50 characters or less
2. Use one of these types: feat, fix, docs, style, refactor, perf, test, build, ci, chore
3. Scope is optional but recommended (e.g., api, ui, auth)
4. Summary must be lowercase and not end with a period
5. Body should explain what and why, not how
6. Footer for breaking changes: BREAKING CHANGE: <description>

The diff is:

{diff}";

const ANGULAR: &str = "Generate a commit message following the Angular format:
<type>(<scope>): <subject>

<body>

<footer>

Rules:
1. Subject line must be 50 characters or less
2. Type must be one of: feat, fix, docs, style, refactor, perf, test, build, ci, chore, revert
3. Scope is required (component/file affected)
4. Subject must be imperative, lowercase, no period
5. Body is optional, wrap at 72 characters
6. Footer for breaking changes or issue references

The diff is:

{diff}";

const GITMOJI: &str = "Generate a commit message following the Gitmoji format:
<emoji> <type>(<scope>): <description>

[optional body]

Rules:
1. Start with an appropriate gitmoji emoji
2. Common emojis: \u{2728} feat, \u{1F41B} fix, \u{1F4DD} docs, \u{1F484} style, \u{267B}\u{FE0F} refactor, \u{26A1}\u{FE0F} perf, \u{2705} test, \u{1F527} config
3. Keep first line under 50 characters (including emoji)
4. Use imperative mood
5. Body is optional for complex changes

The diff is:

{diff}";

const KARMA: &str = "Generate a commit message following the Karma format:
<type>(<scope>): <subject>

<body>

<footer>

Rules:
1. Type must be one of: feat, fix, docs, style, refactor, perf, test, chore
2. Scope is optional
3. Subject must be imperative, present tense
4. Subject must not end with a period
5. Body should use imperative mood
6. Footer for breaking changes: BREAKING CHANGE: <description>

The diff is:

{diff}";

const SEMANTIC: &str = "Generate a commit message following the Semantic Commit format:
<type>: <description>

[optional body]

[optional footer]

Rules:
1. Type must be one of: feat, fix, docs, style, refactor, perf, test, build, ops, chore
2. Description should be concise and clear
3. Use imperative mood
4. First line should be 50 characters or less
5. Body explains the change in detail
6. Footer for references or breaking changes

The diff is:

{diff}";

const GOOGLE: &str = "Generate a commit message following the Google format:
<subject>

<body>

Rules:
1. Subject line: concise summary in imperative mood
2. Subject must be 50 characters or less
3. Separate subject from body with blank line
4. Body: explain what and why, not how
5. Wrap body at 72 characters
6. No specific type prefix required
7. Focus on clarity and completeness

The diff is:

{diff}";

/// Template for `format`. `custom` with an empty template, and any unknown
/// name, fall back to Conventional Commits.
fn template_for(format: &str, custom_template: &str) -> String {
    match format {
        "angular" => ANGULAR.to_string(),
        "gitmoji" => GITMOJI.to_string(),
        "karma" => KARMA.to_string(),
        "semantic" => SEMANTIC.to_string(),
        "google" => GOOGLE.to_string(),
        "custom" if !custom_template.is_empty() => {
            format!("{custom_template}\n\nThe diff is:\n\n{DIFF_PLACEHOLDER}")
        }
        _ => CONVENTIONAL.to_string(),
    }
}

/// Build the full prompt for `diff` in the requested format.
pub fn build_prompt(format: &str, custom_template: &str, diff: &str) -> String {
    let template = template_for(format, custom_template);
    // Only the template's own placeholder is substituted; braces in a custom
    // template or in the diff are left alone.
    match template.rfind(DIFF_PLACEHOLDER) {
        Some(idx) => {
            let mut prompt = String::with_capacity(template.len() + diff.len());
            prompt.push_str(&template[..idx]);
            prompt.push_str(diff);
            prompt.push_str(&template[idx + DIFF_PLACEHOLDER.len()..]);
            prompt
        }
        None => format!("{template}{diff}"),
    }
}
