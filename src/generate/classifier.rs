//! Keyword-based content classification.
//!
//! An ordered rule list evaluated first-match-wins over the lowercased
//! document, with a generic fallback. Profiles carry the canned text blocks
//! the simulated generator renders into post drafts.

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ContentProfile {
    pub(crate) topic: &'static str,
    pub(crate) tech_elements: &'static [&'static str],
    pub(crate) limitations: &'static [&'static str],
    pub(crate) rating: &'static str,
    pub(crate) implementation_level: &'static str,
    pub(crate) audience: &'static str,
    pub(crate) hashtags: &'static str,
}

struct Rule {
    keywords: &'static [&'static str],
    profile: ContentProfile,
}

static RULES: &[Rule] = &[
    Rule {
        keywords: &["dotfiles", "powershell"],
        profile: ContentProfile {
            topic: "Windows dotfiles management",
            tech_elements: &[
                "Dotfiles management for Windows environments",
                "Symlink provisioning via PowerShell scripts",
                "Unified VSCode, Windows Terminal, and SSH configuration",
                "AI-assisted script authoring (Claude, GitHub Copilot)",
            ],
            limitations: &[
                "PowerShell scripts need administrator privileges",
                "Windows-specific (Linux/macOS needs shell-script equivalents)",
                "Symlink creation can overwrite existing files",
                "First run requires an execution-policy change",
            ],
            rating: "A",
            implementation_level: "production",
            audience: "intermediate",
            hashtags: "#dotfiles #PowerShell #Windows #automation #devenv",
        },
    },
    Rule {
        keywords: &["github", "actions"],
        profile: ContentProfile {
            topic: "GitHub workflow automation",
            tech_elements: &[
                "GitHub-centred development workflow optimization",
                "CI/CD pipeline automation",
                "Streamlined issue and PR management",
                "Task automation with GitHub Actions",
            ],
            limitations: &[
                "Usage limits depend on the GitHub pricing plan",
                "Secrets handling needs care in public repositories",
                "External service integrations require setup",
            ],
            rating: "A",
            implementation_level: "production",
            audience: "intermediate",
            hashtags: "#GitHub #Actions #CICD #automation #devops",
        },
    },
    Rule {
        keywords: &["python", "javascript"],
        profile: ContentProfile {
            topic: "practical programming techniques",
            tech_elements: &[
                "Practical use of a mainstream programming language",
                "Hands-on coding techniques",
                "Applications of current ecosystem trends",
                "Development-efficiency best practices",
            ],
            limitations: &[
                "Tied to specific language/framework versions",
                "Environment setup is a prerequisite",
                "Non-trivial learning curve",
            ],
            rating: "B",
            implementation_level: "basic",
            audience: "beginner to intermediate",
            hashtags: "#programming #webdev #bestpractices #productivity",
        },
    },
];

static DEFAULT_PROFILE: ContentProfile = ContentProfile {
    topic: "modern development practices",
    tech_elements: &[
        "Modern development techniques in practice",
        "Productivity gains through automation",
        "Engineering best practices",
        "Practical tooling and technology",
    ],
    limitations: &[
        "Assumes a specific environment and preconditions",
        "Initial setup and learning cost",
        "Compatibility with existing systems must be verified",
    ],
    rating: "B",
    implementation_level: "basic",
    audience: "intermediate",
    hashtags: "#engineering #automation #productivity #tech",
};

pub(crate) fn classify(content: &str) -> &'static ContentProfile {
    let lower = content.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| &rule.profile)
        .unwrap_or(&DEFAULT_PROFILE)
}
