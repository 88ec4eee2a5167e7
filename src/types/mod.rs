pub use self::{
    braavos_price::BraavosPrice,
    ekubo::{
        EkuboLastUpdate, EkuboPool, EkuboPoolLiquidity, EkuboPrice,
        EkuboTickLiquidity,
    },
    haiko::{HaikoDepth, HaikoMarket, HaikoToken},
    loan_state_filter::LoanStateFilter,
    myswap::{LiquidityTick, MySwapPool, MySwapPools, MySwapToken},
    notification_queue::NotificationQueue,
    order_book::{OrderBookSnapshot, PriceLevel},
    protocol::ProtocolId,
    rate_limiter::RateLimiter,
    rpc::{EmittedEvent, EventsChunk, RpcError, RpcRequest, RpcResponse},
    subscription::{
        CreateSubscription, SubscriptionCreated, ValidSubscription,
        TELEGRAM_ID_MIN_LENGTH,
    },
    token::{
        clean_address, find_by_address, find_by_symbol, find_token,
        get_decimals, get_symbol, normalize_address, TokenSettings,
        TOKEN_SETTINGS,
    },
    token_values::{interest_rate_models, Portfolio, Prices, TokenValues},
};

mod braavos_price;
mod ekubo;
mod haiko;
mod loan_state_filter;
mod myswap;
mod notification_queue;
mod order_book;
mod protocol;
mod rate_limiter;
mod rpc;
mod subscription;
mod token;
mod token_values;
