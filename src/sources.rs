//! Built-in registry of remote block-list sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block-list category a source contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Advertisement,
    Malicious,
    SocialEngineering,
    Explicit,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Advertisement,
        Category::Malicious,
        Category::SocialEngineering,
        Category::Explicit,
    ];

    /// Stable name used for output file paths and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Advertisement => "advertisement",
            Category::Malicious => "malicious",
            Category::SocialEngineering => "social-engineering",
            Category::Explicit => "explicit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single remote block-list source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub category: Category,
}

impl Source {
    pub fn new(url: &str, category: Category) -> Self {
        Self {
            url: url.to_string(),
            category,
        }
    }
}

/// The default source registry. The config file may replace it wholesale.
pub fn default_sources() -> Vec<Source> {
    let advertisement = [
        "https://raw.githubusercontent.com/259095/someonewhocares/main/list",
        "https://raw.githubusercontent.com/AdAway/adaway.github.io/master/hosts.txt",
        "https://raw.githubusercontent.com/DRSDavidSoft/additional-hosts/master/domains/blacklist/adservers-and-trackers.txt",
        "https://raw.githubusercontent.com/ShadowWhisperer/BlockLists/master/Lists/Ads",
        "https://raw.githubusercontent.com/StevenBlack/hosts/master/hosts",
        "https://raw.githubusercontent.com/anudeepND/blacklist/master/adservers.txt",
        "https://raw.githubusercontent.com/badmojr/1Hosts/master/Xtra/domains.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/ads.txt",
        "https://raw.githubusercontent.com/d3ward/toolz/master/src/d3host.txt",
        "https://raw.githubusercontent.com/jerryn70/GoodbyeAds/master/Hosts/GoodbyeAds.txt",
        "https://raw.githubusercontent.com/lightswitch05/hosts/master/docs/lists/ads-and-tracking-extended.txt",
        "https://raw.githubusercontent.com/mkb2091/blockconvert/master/output/domains.txt",
    ];
    let malicious = [
        "https://raw.githubusercontent.com/BlackJack8/iOSAdblockList/master/Regular%20Hosts.txt",
        "https://raw.githubusercontent.com/DandelionSprout/adfilt/master/Alternate%20versions%20Anti-Malware%20List/AntiMalwareDomains.txt",
        "https://raw.githubusercontent.com/ShadowWhisperer/BlockLists/master/Lists/Bloat",
        "https://raw.githubusercontent.com/ShadowWhisperer/BlockLists/master/Lists/Malware",
        "https://raw.githubusercontent.com/ShadowWhisperer/BlockLists/master/Lists/Tracking",
        "https://raw.githubusercontent.com/allendema/noplaylist/main/NoPlayList.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/malware.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/piracy.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/ransomware.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/smart-tv.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/tracking.txt",
        "https://raw.githubusercontent.com/bongochong/CombinedPrivacyBlockLists/master/newhosts-final.hosts",
        "https://raw.githubusercontent.com/crazy-max/WindowsSpyBlocker/master/data/hosts/spy.txt",
        "https://raw.githubusercontent.com/davidonzo/Threat-Intel/master/lists/latestdomains.txt",
        "https://raw.githubusercontent.com/justdomains/blocklists/master/lists/easyprivacy-justdomains.txt",
        "https://raw.githubusercontent.com/lightswitch05/hosts/master/docs/lists/tracking-aggressive-extended.txt",
        "https://raw.githubusercontent.com/notracking/hosts-blocklists/master/hostnames.txt",
    ];
    let social_engineering = [
        "https://raw.githubusercontent.com/MetaMask/eth-phishing-detect/master/src/hosts.txt",
        "https://raw.githubusercontent.com/ShadowWhisperer/BlockLists/master/Lists/Scam",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/abuse.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/fraud.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/scam.txt",
        "https://raw.githubusercontent.com/mitchellkrogza/Phishing.Database/master/phishing-domains-ACTIVE.txt",
        "https://raw.githubusercontent.com/tg12/pihole-phishtank-list/master/list/phish_domains.txt",
        "https://raw.githubusercontent.com/blocklistproject/Lists/master/phishing.txt",
        "https://raw.githubusercontent.com/durablenapkin/scamblocklist/master/hosts.txt",
        "https://raw.githubusercontent.com/infinitytec/blocklists/master/scams-and-phishing.txt",
    ];
    let explicit = [
        "https://raw.githubusercontent.com/Bon-Appetit/porn-domains/master/block.txt",
        "https://raw.githubusercontent.com/Clefspeare13/pornhosts/master/127.0.0.1/hosts",
        "https://raw.githubusercontent.com/Sinfonietta/hostfiles/master/pornography-hosts",
        "https://raw.githubusercontent.com/StevenBlack/hosts/master/alternates/porn/hosts",
        "https://raw.githubusercontent.com/mhhakim/pihole-blocklist/master/porn.txt",
    ];

    let mut sources = Vec::new();
    for url in advertisement {
        sources.push(Source::new(url, Category::Advertisement));
    }
    for url in malicious {
        sources.push(Source::new(url, Category::Malicious));
    }
    for url in social_engineering {
        sources.push(Source::new(url, Category::SocialEngineering));
    }
    for url in explicit {
        sources.push(Source::new(url, Category::Explicit));
    }
    sources
}

/// Drop sources with duplicate URLs within a category, keeping first occurrence.
pub fn dedup_sources(sources: &[Source]) -> Vec<Source> {
    let mut seen = std::collections::HashSet::new();
    sources
        .iter()
        .filter(|s| seen.insert((s.category, s.url.clone())))
        .cloned()
        .collect()
}
