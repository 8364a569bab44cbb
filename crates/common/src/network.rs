use crate::constants::{
    HNT_DECIMALS, HNT_MINT, HNT_REGISTRAR, IOT_MINT, IOT_REGISTRAR, IOT_SUB_DAO, MOBILE_MINT,
    MOBILE_REGISTRAR, MOBILE_SUB_DAO,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// the primary token and its sub-network tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Hnt,
    Mobile,
    Iot,
}

/// networks that have their own sub-DAO, epoch records and treasury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubNetwork {
    Mobile,
    Iot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Hnt,
    Mobile,
    Iot,
}

/// fixed display metadata of a network stats card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub title: &'static str,
    pub link: &'static str,
    pub link_text: &'static str,
    pub icon: Icon,
    pub active_url: Option<&'static str>,
    pub max_description: &'static str,
    pub active_details: &'static str,
}

const HNT_INFO: NetworkInfo = NetworkInfo {
    title: "HNT",
    link: "https://docs.helium.com/helium-tokens/hnt",
    link_text: "Learn More About HNT",
    icon: Icon::Hnt,
    active_url: None,
    max_description: "This is an approximate number as it does not include net emissions",
    active_details: "",
};

const MOBILE_INFO: NetworkInfo = NetworkInfo {
    title: "MOBILE",
    link: "https://docs.helium.com/tokens/mobile-token/",
    link_text: "Learn More About MOBILE",
    icon: Icon::Mobile,
    active_url: Some("https://mobile-rewards.oracle.helium.io/active-devices"),
    max_description: "This is an upper limit that will not be reached and does not consider future MOBILE burn. Reason: Daily emissions are currently only 86% of scheduled emissions, as not all rewardable entities (service providers, and oracles) exist or currently receive rewards.",
    active_details: " This exclusively includes active gateways (not radios).",
};

const IOT_INFO: NetworkInfo = NetworkInfo {
    title: "IOT",
    link: "https://docs.helium.com/tokens/iot-token/",
    link_text: "Learn More About IOT",
    icon: Icon::Iot,
    active_url: Some("https://iot-rewards.oracle.helium.io/active-devices"),
    max_description: "This is an upper limit that will not be reached and does not consider future IOT burn. Reason: Daily emissions are currently only 93% of scheduled emissions, as oracles do not currently receive rewards.",
    active_details: "",
};

impl Network {
    pub const ALL: [Network; 3] = [Network::Hnt, Network::Mobile, Network::Iot];

    pub fn info(&self) -> NetworkInfo {
        match self {
            Network::Hnt => HNT_INFO,
            Network::Mobile => MOBILE_INFO,
            Network::Iot => IOT_INFO,
        }
    }

    pub fn mint(&self) -> &'static str {
        match self {
            Network::Hnt => HNT_MINT,
            Network::Mobile => MOBILE_MINT,
            Network::Iot => IOT_MINT,
        }
    }

    /// decimals assumed when the mint account reports none
    pub fn default_decimals(&self) -> u8 {
        match self {
            Network::Hnt => HNT_DECIMALS,
            Network::Mobile | Network::Iot => 6,
        }
    }

    pub fn registrar(&self) -> &'static str {
        match self {
            Network::Hnt => HNT_REGISTRAR,
            Network::Mobile => MOBILE_REGISTRAR,
            Network::Iot => IOT_REGISTRAR,
        }
    }
}

impl SubNetwork {
    pub fn network(&self) -> Network {
        match self {
            SubNetwork::Mobile => Network::Mobile,
            SubNetwork::Iot => Network::Iot,
        }
    }

    pub fn sub_dao(&self) -> &'static str {
        match self {
            SubNetwork::Mobile => MOBILE_SUB_DAO,
            SubNetwork::Iot => IOT_SUB_DAO,
        }
    }

    pub fn info(&self) -> NetworkInfo {
        self.network().info()
    }

    pub fn mint(&self) -> &'static str {
        self.network().mint()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().title)
    }
}

impl fmt::Display for SubNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().title)
    }
}
