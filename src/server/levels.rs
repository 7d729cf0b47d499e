use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Level {
    pub name: &'static str,
    pub elo: u32,
    pub description: &'static str,
}

pub const LEVELS: [Level; 5] = [
    Level {
        name: "Beginner",
        elo: 1350,
        description: "The assistant will play at an Elo rating of 1350. This is a good level for beginners.",
    },
    Level {
        name: "Intermediate",
        elo: 1500,
        description: "The assistant will play at an Elo rating of 1500. This is a good level for intermediate players.",
    },
    Level {
        name: "Advanced",
        elo: 2000,
        description: "The assistant will play at an Elo rating of 2000. This is a good level for advanced players.",
    },
    Level {
        name: "Expert",
        elo: 2500,
        description: "The assistant will play at an Elo rating of 2500. This is a good level for expert players.",
    },
    Level {
        name: "Grandmaster",
        elo: 2850,
        description: "The assistant will play at an Elo rating of 2850. This is a good level for grandmasters.",
    },
];
