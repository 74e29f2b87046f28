pub mod captcha;
pub mod rate_limit;
