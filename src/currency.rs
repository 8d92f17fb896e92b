//! Currencies supported by Uphold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! currencies {
    ($($variant:ident => $desc:literal,)+) => {
        /// ISO 4217 style currency code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Currency {
            $($variant,)+
        }

        impl Currency {
            pub const ALL: &'static [Currency] = &[$(Currency::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Currency::$variant => stringify!($variant),)+
                }
            }

            /// Human readable name.
            pub fn description(&self) -> &'static str {
                match self {
                    $(Currency::$variant => $desc,)+
                }
            }
        }

        impl FromStr for Currency {
            type Err = UnknownCurrency;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let code = s.trim().to_ascii_uppercase();
                Currency::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str() == code)
                    .ok_or_else(|| UnknownCurrency(s.to_string()))
            }
        }
    };
}

currencies! {
    AED => "United Arab Emirates Dirham",
    ARS => "Argentine Peso",
    AUD => "Australian Dollars",
    BRL => "Brazilian Real",
    BTC => "Bitcoin",
    CAD => "Canadian Dollars",
    CHF => "Swiss Franc",
    CNY => "Yuan",
    DKK => "Danish Krone",
    EUR => "Euros",
    GBP => "Pounds",
    HKD => "Hong Kong Dollars",
    ILS => "Israeli Sheqel",
    INR => "Indian Rupee",
    JPY => "Yen",
    KES => "Kenyan Shillings",
    MXN => "Mexican Pesos",
    NOK => "Norwegian Krone",
    NZD => "New Zealand Dollars",
    PHP => "Philippine Peso",
    PLN => "Polish Zloty",
    SEK => "Swedish Krona",
    SGD => "Singapore Dollars",
    USD => "U.S. dollars",
    VOX => "Voxels",
    XAG => "Silver",
    XAU => "Gold",
    XPL => "Palladium",
    XPT => "Platinum",
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);
