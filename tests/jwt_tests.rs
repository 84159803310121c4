//! 访问令牌编解码测试
//!
//! 覆盖签发/校验往返、签名破坏、算法混淆、过期边界和两种声明形态。

use auth_system::auth::jwt::{AccessClaims, JwtService, TokenError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

mod common;

const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

fn test_service() -> JwtService {
    JwtService::from_config(&common::create_test_config()).unwrap()
}

/// 用任意声明/算法/密钥手工签一个令牌
fn sign_with(claims: &serde_json::Value, alg: Algorithm, secret: &str) -> String {
    encode(
        &Header::new(alg),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_issue_validate_round_trip_preserves_user_id() {
    let service = test_service();
    let now = Utc::now();

    let token = service.issue(1, now).unwrap();
    let claims = service.validate(&token, now).unwrap();

    assert_eq!(claims.user_id, 1);
    assert_eq!(claims.iat, now.timestamp());
    assert_eq!(claims.exp, now.timestamp() + 3600);
    assert_eq!(claims.iss, "auth-system");
}

#[test]
fn test_expiry_boundary_is_inclusive() {
    let service = test_service();
    let now = Utc::now();
    let token = service.issue(1, now).unwrap();

    // 恰好在过期时刻检查：仍然有效
    let at_boundary = now + Duration::seconds(3600);
    assert!(service.validate(&token, at_boundary).is_ok());

    // 过期时刻之后一秒：失败
    let past_boundary = now + Duration::seconds(3601);
    assert_eq!(
        service.validate(&token, past_boundary).unwrap_err(),
        TokenError::Expired
    );
}

#[test]
fn test_tampered_signature_is_rejected() {
    let service = test_service();
    let now = Utc::now();
    let token = service.issue(1, now).unwrap();

    let mut parts: Vec<String> = token.split('.').map(|s| s.to_string()).collect();
    assert_eq!(parts.len(), 3);

    // 改掉签名段的最后一个字符
    let sig = &parts[2];
    let replacement = if sig.ends_with('A') { 'B' } else { 'A' };
    let mut tampered_sig: String = sig[..sig.len() - 1].to_string();
    tampered_sig.push(replacement);
    parts[2] = tampered_sig;

    let tampered = parts.join(".");
    assert_eq!(
        service.validate(&tampered, now).unwrap_err(),
        TokenError::BadSignature
    );
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let service = test_service();
    let now = Utc::now();

    let claims = json!({
        "user_id": 1,
        "iat": now.timestamp(),
        "exp": now.timestamp() + 3600,
        "iss": "auth-system",
    });
    let token = sign_with(&claims, Algorithm::HS256, "another-secret-also-32-characters!!");

    assert_eq!(
        service.validate(&token, now).unwrap_err(),
        TokenError::BadSignature
    );
}

#[test]
fn test_algorithm_confusion_is_rejected() {
    let service = test_service();
    let now = Utc::now();

    let claims = json!({
        "user_id": 1,
        "iat": now.timestamp(),
        "exp": now.timestamp() + 3600,
        "iss": "auth-system",
    });

    // 同一密钥、不同的 HMAC 变体：只接受 HS256
    let hs384 = sign_with(&claims, Algorithm::HS384, TEST_SECRET);
    assert_eq!(
        service.validate(&hs384, now).unwrap_err(),
        TokenError::BadSignature
    );

    let hs512 = sign_with(&claims, Algorithm::HS512, TEST_SECRET);
    assert_eq!(
        service.validate(&hs512, now).unwrap_err(),
        TokenError::BadSignature
    );
}

#[test]
fn test_unsigned_none_token_is_rejected() {
    let service = test_service();
    let now = Utc::now();

    // 手工拼一个 alg=none、签名为空的令牌
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "user_id": 1,
            "iat": now.timestamp(),
            "exp": now.timestamp() + 3600,
            "iss": "auth-system",
        })
        .to_string(),
    );
    let token = format!("{}.{}.", header, payload);

    let err = service.validate(&token, now).unwrap_err();
    assert!(matches!(
        err,
        TokenError::Malformed | TokenError::BadSignature
    ));
}

#[test]
fn test_missing_expiry_claim() {
    let service = test_service();
    let now = Utc::now();

    let claims = json!({
        "user_id": 1,
        "iat": now.timestamp(),
        "iss": "auth-system",
    });
    let token = sign_with(&claims, Algorithm::HS256, TEST_SECRET);

    assert_eq!(
        service.validate(&token, now).unwrap_err(),
        TokenError::MissingExpiry
    );
}

#[test]
fn test_non_numeric_expiry_claim() {
    let service = test_service();
    let now = Utc::now();

    let claims = json!({
        "user_id": 1,
        "iat": now.timestamp(),
        "exp": "tomorrow",
        "iss": "auth-system",
    });
    let token = sign_with(&claims, Algorithm::HS256, TEST_SECRET);

    assert_eq!(
        service.validate(&token, now).unwrap_err(),
        TokenError::MissingExpiry
    );
}

#[test]
fn test_wrong_issuer_is_rejected() {
    let service = test_service();
    let now = Utc::now();

    let claims = json!({
        "user_id": 1,
        "iat": now.timestamp(),
        "exp": now.timestamp() + 3600,
        "iss": "somebody-else",
    });
    let token = sign_with(&claims, Algorithm::HS256, TEST_SECRET);

    assert_eq!(
        service.validate(&token, now).unwrap_err(),
        TokenError::WrongIssuer
    );
}

#[test]
fn test_garbage_tokens_are_malformed() {
    let service = test_service();
    let now = Utc::now();

    for garbage in ["", "abc", "a.b", "a.b.c", "....."] {
        assert_eq!(
            service.validate(garbage, now).unwrap_err(),
            TokenError::Malformed,
            "token {:?} should be malformed",
            garbage
        );
    }
}

#[test]
fn test_wire_map_and_typed_claims_share_validity_rules() {
    let now = Utc::now();

    // 宽松的键值映射形态（线上格式）
    let map = json!({
        "user_id": 9,
        "iat": now.timestamp(),
        "exp": now.timestamp() + 60,
        "iss": "auth-system",
    })
    .as_object()
    .cloned()
    .unwrap();

    let from_wire = AccessClaims::from_wire(&map).unwrap();
    assert_eq!(from_wire.user_id, 9);
    from_wire.check_validity(now, "auth-system").unwrap();

    // 强类型形态，直接构造，走同一套规则
    let typed = AccessClaims::new(9, now, 60, "auth-system");
    typed.check_validity(now, "auth-system").unwrap();

    // 两种形态对同样的失效条件给出同样的判定
    let later = now + Duration::seconds(61);
    assert_eq!(
        from_wire.check_validity(later, "auth-system").unwrap_err(),
        TokenError::Expired
    );
    assert_eq!(
        typed.check_validity(later, "auth-system").unwrap_err(),
        TokenError::Expired
    );
    assert_eq!(
        from_wire.check_validity(now, "other").unwrap_err(),
        TokenError::WrongIssuer
    );
    assert_eq!(
        typed.check_validity(now, "other").unwrap_err(),
        TokenError::WrongIssuer
    );
}

#[test]
fn test_wire_map_field_validation() {
    let now = Utc::now();

    // exp 缺失
    let map = json!({"user_id": 1, "iat": now.timestamp(), "iss": "auth-system"})
        .as_object()
        .cloned()
        .unwrap();
    assert_eq!(
        AccessClaims::from_wire(&map).unwrap_err(),
        TokenError::MissingExpiry
    );

    // user_id 不是整数
    let map = json!({"user_id": "one", "iat": 0, "exp": 1, "iss": "auth-system"})
        .as_object()
        .cloned()
        .unwrap();
    assert_eq!(
        AccessClaims::from_wire(&map).unwrap_err(),
        TokenError::Malformed
    );
}
