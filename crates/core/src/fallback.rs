//! Built-in ideas used when no source produced anything.

use crate::generate::{IdeaCandidate, IdeaType};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn fallback_ideas() -> Vec<IdeaCandidate> {
    vec![
        IdeaCandidate {
            idea_type: IdeaType::DeploymentService,
            name: "AI agent deployment service".to_string(),
            description: "Deploy self-hosted AI agents for customers and provide technical support"
                .to_string(),
            target_users: strings(&["content creators", "online sellers", "small businesses"]),
            cost: 500,
            expected_income: 5000,
            time_needed: 2.0,
            project: "AI Agent".to_string(),
            project_url: String::new(),
            source: None,
            potential: None,
            tags: Vec::new(),
            implementation: strings(&[
                "List the service on a freelance marketplace",
                "Prepare a minimal cloud server image",
                "Standardize the deployment runbook (about 2 hours per customer)",
                "Offer 7 days of technical support",
            ]),
        },
        IdeaCandidate {
            idea_type: IdeaType::Training,
            name: "AI agent usage tutorials".to_string(),
            description: "Produce AI agent tutorials and sell them to learners".to_string(),
            target_users: strings(&["learners", "developers", "corporate staff"]),
            cost: 0,
            expected_income: 1000,
            time_needed: 3.0,
            project: "AI Agent".to_string(),
            project_url: String::new(),
            source: None,
            potential: None,
            tags: Vec::new(),
            implementation: strings(&[
                "Record video tutorials",
                "Write companion text guides",
                "Set up a paid monthly subscription",
                "Publish updates regularly",
            ]),
        },
        IdeaCandidate {
            idea_type: IdeaType::Consulting,
            name: "AI automation consulting".to_string(),
            description: "Advise companies on moving workflows to AI automation".to_string(),
            target_users: strings(&["enterprises", "founders", "product managers"]),
            cost: 100,
            expected_income: 10000,
            time_needed: 1.0,
            project: "AI Automation".to_string(),
            project_url: String::new(),
            source: None,
            potential: None,
            tags: Vec::new(),
            implementation: strings(&[
                "Write up case studies",
                "Publish articles on professional networks",
                "Set an hourly consulting rate",
                "Offer solution design engagements",
            ]),
        },
    ]
}
