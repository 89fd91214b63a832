//! Static page content. Rankings and tiers are fixed literals.

pub const TAGLINE: &str = "The best survival server with clans, progression and a friendly community";
pub const UPTIME_BADGE: &str = "Server online 24/7";

pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

/// Headline counters; the live online count is shown separately
pub const STATS: &[Stat] = &[
    Stat { label: "Clans", value: "38" },
    Stat { label: "Active", value: "1,542" },
    Stat { label: "Version", value: "1.20" },
];

pub struct Rule {
    pub title: &'static str,
    pub description: &'static str,
}

pub const RULES: &[Rule] = &[
    Rule { title: "Respect", description: "Treat other players with respect" },
    Rule { title: "No cheats", description: "Using cheats leads to a ban" },
    Rule { title: "No griefing", description: "Do not break other players' builds" },
    Rule { title: "Clean chat", description: "No swearing, spam or advertising" },
];

pub struct ConnectStep {
    pub title: &'static str,
    pub detail: &'static str,
}

/// `{address}` in a detail line is replaced with the configured address
pub const CONNECT_STEPS: &[ConnectStep] = &[
    ConnectStep { title: "Launch Minecraft", detail: "Version 1.20 or newer" },
    ConnectStep { title: "Open \"Multiplayer\"", detail: "From the game's main menu" },
    ConnectStep { title: "Add the server", detail: "Address: {address}" },
    ConnectStep { title: "Join and play!", detail: "Welcome aboard" },
];

pub struct Clan {
    pub rank: u8,
    pub name: &'static str,
    pub members: u32,
    pub points: u32,
}

pub const CLANS: &[Clan] = &[
    Clan { rank: 1, name: "Dragons", members: 48, points: 15420 },
    Clan { rank: 2, name: "Night Wolves", members: 42, points: 14230 },
    Clan { rank: 3, name: "Wardens", members: 38, points: 13100 },
    Clan { rank: 4, name: "Legends", members: 35, points: 11850 },
    Clan { rank: 5, name: "Phoenix", members: 31, points: 10200 },
];

pub struct Player {
    pub rank: u8,
    pub name: &'static str,
    pub level: u32,
    pub clan: &'static str,
}

pub const TOP_PLAYERS: &[Player] = &[
    Player { rank: 1, name: "ShadowMaster", level: 127, clan: "Dragons" },
    Player { rank: 2, name: "CrystalKnight", level: 115, clan: "Wardens" },
    Player { rank: 3, name: "DiamondHunter", level: 108, clan: "Night Wolves" },
    Player { rank: 4, name: "FirePhoenix", level: 102, clan: "Phoenix" },
    Player { rank: 5, name: "IceWizard", level: 98, clan: "Legends" },
];

pub struct DonationTier {
    pub name: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
    pub popular: bool,
}

pub const DONATION_TIERS: &[DonationTier] = &[
    DonationTier {
        name: "VIP",
        price: "299₽",
        features: &["Private chat", "Colored nickname", "5 claims", "Resource kit"],
        popular: false,
    },
    DonationTier {
        name: "Premium",
        price: "599₽",
        features: &["Everything in VIP", "Fly at spawn", "10 claims", "Exclusive items", "Arena access"],
        popular: true,
    },
    DonationTier {
        name: "Ultimate",
        price: "999₽",
        features: &["Everything in Premium", "Creative mode", "20 claims", "Custom commands", "Personal warp"],
        popular: false,
    },
];

/// Render a connection step detail for the given address
pub fn step_detail(step: &ConnectStep, address: &str) -> String {
    step.detail.replace("{address}", address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rankings_are_ordered() {
        assert!(CLANS.windows(2).all(|w| w[0].rank < w[1].rank && w[0].points > w[1].points));
        assert!(TOP_PLAYERS.windows(2).all(|w| w[0].rank < w[1].rank && w[0].level >= w[1].level));
    }

    #[test]
    fn test_exactly_one_popular_tier() {
        assert_eq!(DONATION_TIERS.iter().filter(|t| t.popular).count(), 1);
    }

    #[test]
    fn test_step_detail_substitutes_address() {
        assert_eq!(step_detail(&CONNECT_STEPS[2], "play.myserver.ru"), "Address: play.myserver.ru");
        assert_eq!(step_detail(&CONNECT_STEPS[0], "play.myserver.ru"), "Version 1.20 or newer");
    }
}
