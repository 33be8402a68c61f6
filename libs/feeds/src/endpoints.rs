//! Upstream URLs
//!
//! Every request is a fixed URL; the only variable parts are the asset
//! lists baked in below.

use pulse_types::Metal;

/// Tracked crypto assets as (CoinGecko id, ticker symbol)
pub const TRACKED_ASSETS: [(&str, &str); 6] = [
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("ripple", "XRP"),
    ("litecoin", "LTC"),
    ("dash", "DASH"),
];

/// Tokenized trackers standing in for spot metal prices (CoinGecko ids)
pub const METAL_PROXIES: [(&str, Metal); 4] = [
    ("pax-gold", Metal::Gold),
    ("kinesis-silver", Metal::Silver),
    ("wrapped-platinum", Metal::Platinum),
    ("palladium-token", Metal::Palladium),
];

pub const COINGECKO_CRYPTO_URL: &str = "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin,ethereum,solana,ripple,litecoin,dash&vs_currencies=usd&include_24hr_change=true";

pub const CRYPTOCOMPARE_CRYPTO_URL: &str =
    "https://min-api.cryptocompare.com/data/pricemultifull?fsyms=BTC,ETH,SOL,XRP,LTC,DASH&tsyms=USD";

pub const EXCHANGE_RATE_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

pub const COINGECKO_METALS_URL: &str = "https://api.coingecko.com/api/v3/simple/price?ids=pax-gold,kinesis-silver,wrapped-platinum,palladium-token&vs_currencies=usd&include_24hr_change=true";

pub const FEAR_GREED_URL: &str = "https://api.alternative.me/fng/?limit=1";

pub const DEFILLAMA_CHARTS_URL: &str = "https://api.llama.fi/charts";

pub const CLOUDFLARE_ETH_RPC: &str = "https://cloudflare-eth.com";

pub const CRYPTOCOMPARE_NEWS_URL: &str = "https://min-api.cryptocompare.com/data/v2/news/?lang=EN";
