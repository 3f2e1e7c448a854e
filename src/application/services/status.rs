//! Status blocks sent in reply to `.alive`

use crate::infrastructure::config::BotConfig;
use crate::infrastructure::system::HostStats;

/// Identity fields shown in status replies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotProfile {
    pub name: String,
    pub owner: String,
    pub user: String,
    pub mode: String,
    pub version: String,
    pub total_users: u32,
}

impl From<&BotConfig> for BotProfile {
    fn from(config: &BotConfig) -> Self {
        Self {
            name: config.name.clone(),
            owner: config.owner.clone(),
            user: config.user.clone(),
            mode: config.mode.clone(),
            version: config.version.clone(),
            total_users: config.total_users,
        }
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::from(&BotConfig::default())
    }
}

/// Reply to `.info`
pub fn identity(profile: &BotProfile) -> String {
    format!(
        "🤖 {} bot with AI\nOwner: {}\nVersion: {}",
        profile.name, profile.owner, profile.version
    )
}

pub fn system_info(profile: &BotProfile, host: &HostStats) -> String {
    format!(
        "
╭═══〘 {name} 〙═══⊷❍
┃✦╭──────────────
┃✦│ Owner : {owner}
┃✦│ User : {user}
┃✦│ Mode : {mode}
┃✦│ Server : {os}
┃✦│ Available RAM : {free} MB of {total} MB
┃✦│ Total Users : {users}
┃✦│ Version : {version}
┃✦╰───────────────
╰═════════════════⊷",
        name = profile.name,
        owner = profile.owner,
        user = profile.user,
        mode = profile.mode,
        os = host.os_type,
        free = host.free_mb,
        total = host.total_mb,
        users = profile.total_users,
        version = profile.version,
    )
}

const MENU_ENTRIES: &[&str] = &[
    ".setvar", ".getvar", ".delvar", ".setenv", ".delsudo", ".afk", ".afkadmin", ".chatbot",
    ".chatbot on/off", ".info", ".list", ".alive", ".setalive", ".games", ".mention", ".reload",
    ".reboot", ".gif", ".rotate", ".flip", ".del", ".ytv", ".yta", ".song", ".play", ".video",
];

pub fn general_menu() -> String {
    let mut menu = String::from("\n╭════〘 General 〙════⊷❍\n");
    for (i, entry) in MENU_ENTRIES.iter().enumerate() {
        menu.push_str(&format!("┃✦│ {}. {}\n", i + 1, entry));
    }
    menu.push_str(&format!("┃✦│ {}-35 → placeholders\n", MENU_ENTRIES.len() + 1));
    menu.push_str("┃✦╰─────────────────❍\n");
    menu.push_str("╰══════════════════⊷❍");
    menu
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostStats {
        HostStats {
            os_type: "Linux".to_string(),
            free_mb: 1536,
            total_mb: 4096,
        }
    }

    #[test]
    fn test_system_info_fields() {
        let info = system_info(&BotProfile::default(), &host());
        assert!(info.starts_with("\n╭═══〘 Prick 〙═══⊷❍"));
        assert!(info.contains("┃✦│ Owner : Iyii\n"));
        assert!(info.contains("┃✦│ Mode : private\n"));
        assert!(info.contains("┃✦│ Server : Linux\n"));
        assert!(info.contains("┃✦│ Available RAM : 1536 MB of 4096 MB\n"));
        assert!(info.contains("┃✦│ Total Users : 3\n"));
        assert!(info.contains("┃✦│ Version : 6.2.4\n"));
    }

    #[test]
    fn test_general_menu() {
        let menu = general_menu();
        assert!(menu.contains("┃✦│ 1. .setvar\n"));
        assert!(menu.contains("┃✦│ 9. .chatbot on/off\n"));
        assert!(menu.contains("┃✦│ 26. .video\n"));
        assert!(menu.contains("┃✦│ 27-35 → placeholders\n"));
        assert!(menu.ends_with("╰══════════════════⊷❍"));
    }

    #[test]
    fn test_identity() {
        let profile = BotProfile {
            name: "Test".to_string(),
            version: "1.0".to_string(),
            ..BotProfile::default()
        };
        assert_eq!(identity(&profile), "🤖 Test bot with AI\nOwner: Iyii\nVersion: 1.0");
    }
}
