use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of contributor titles, each with a fixed display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    CodeArchitect,
    TheCleaner,
    TsunamiCoder,
    RapidFire,
    NovelWriter,
    Veteran,
    Warrior,
    Defender,
    RisingStar,
    FreshBlood,
    Inactive,
}

impl Title {
    pub const ALL: [Title; 11] = [
        Title::CodeArchitect,
        Title::TheCleaner,
        Title::TsunamiCoder,
        Title::RapidFire,
        Title::NovelWriter,
        Title::Veteran,
        Title::Warrior,
        Title::Defender,
        Title::RisingStar,
        Title::FreshBlood,
        Title::Inactive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Title::CodeArchitect => "Code Architect",
            Title::TheCleaner => "The Cleaner",
            Title::TsunamiCoder => "Tsunami Coder",
            Title::RapidFire => "Rapid Fire",
            Title::NovelWriter => "Novel Writer",
            Title::Veteran => "Veteran",
            Title::Warrior => "Warrior",
            Title::Defender => "Defender",
            Title::RisingStar => "Rising Star",
            Title::FreshBlood => "Fresh Blood",
            Title::Inactive => "Inactive",
        }
    }

    /// Hex color the rendering layer paints the badge with.
    pub fn color(self) -> &'static str {
        match self {
            Title::CodeArchitect => "#FFD700",
            Title::TheCleaner => "#00CED1",
            Title::TsunamiCoder => "#1E90FF",
            Title::RapidFire => "#FF4500",
            Title::NovelWriter => "#9370DB",
            Title::Veteran => "#C0C0C0",
            Title::Warrior => "#CD7F32",
            Title::Defender => "#2E8B57",
            Title::RisingStar => "#FFA500",
            Title::FreshBlood => "#32CD32",
            Title::Inactive => "#808080",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First matching rule wins; the order below is part of the contract.
pub fn classify(commits: u64, additions: u64, deletions: u64) -> Title {
    let total = additions.saturating_add(deletions);
    let ratio = if commits > 0 {
        total as f64 / commits as f64
    } else {
        0.0
    };
    let delete_ratio = if total > 0 {
        deletions as f64 / total as f64
    } else {
        0.0
    };

    if commits >= 500 {
        Title::CodeArchitect
    } else if delete_ratio > 0.6 && total > 100 {
        Title::TheCleaner
    } else if ratio > 500.0 {
        Title::TsunamiCoder
    } else if ratio < 20.0 && commits > 50 {
        Title::RapidFire
    } else if additions > 50_000 {
        Title::NovelWriter
    } else if commits >= 100 {
        Title::Veteran
    } else if commits >= 50 {
        Title::Warrior
    } else if commits >= 20 {
        Title::Defender
    } else if commits >= 10 {
        Title::RisingStar
    } else if commits >= 1 {
        Title::FreshBlood
    } else {
        Title::Inactive
    }
}
