//! 密码哈希功能测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use auth_system::auth::password::PasswordHasher;
use auth_system::error::AppError;

#[test]
fn test_password_hash_and_verify() {
    let hasher = PasswordHasher::new();
    let password = "password1";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 哈希值应该包含 argon2 标识，且绝不等于明文
    assert!(hash.contains("$argon2"));
    assert_ne!(hash, password);

    // 验证正确密码
    hasher.verify(password, &hash).expect("Verification should succeed");
}

#[test]
fn test_password_verify_with_wrong_password() {
    let hasher = PasswordHasher::new();
    let password = "password1";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 验证错误密码应该失败
    let result = hasher.verify("wrong", &hash);
    assert!(result.is_err(), "Wrong password should fail verification");
}

#[test]
fn test_password_hash_different_each_time() {
    let hasher = PasswordHasher::new();
    let password = "password1";

    let hash1 = hasher.hash(password).expect("First hash should succeed");
    let hash2 = hasher.hash(password).expect("Second hash should succeed");

    // 由于随机盐，每次生成的哈希应该不同
    assert_ne!(hash1, hash2, "Hashes should be different due to salt");

    // 但两个哈希都应该能验证同一个密码
    hasher.verify(password, &hash1).expect("First hash should verify");
    hasher.verify(password, &hash2).expect("Second hash should verify");
}

#[test]
fn test_password_hash_empty_string() {
    let hasher = PasswordHasher::new();
    let password = "";

    let hash = hasher.hash(password).expect("Empty password should hash");

    // 空密码应该能验证
    hasher.verify(password, &hash).expect("Empty password should verify");

    // 非空密码应该验证失败
    assert!(hasher.verify("password", &hash).is_err());
}

#[test]
fn test_password_hash_unicode() {
    let hasher = PasswordHasher::new();
    let password = "密码测试Test123!🔒";

    let hash = hasher.hash(password).expect("Unicode password should hash");

    hasher.verify(password, &hash).expect("Unicode password should verify");

    // 稍有不同的 Unicode 密码应该失败
    assert!(hasher.verify("密码测试Test123🔒", &hash).is_err());
}

#[test]
fn test_corrupt_stored_hash_is_verification_failure() {
    let hasher = PasswordHasher::new();

    // 损坏的存储哈希按验证失败处理，而不是服务器错误
    for corrupt in ["invalid_hash", "$argon2id$v=19$invalid", ""] {
        let err = hasher.verify("password1", corrupt).unwrap_err();
        assert!(
            matches!(err, AppError::Unauthorized),
            "corrupt hash {:?} should map to Unauthorized",
            corrupt
        );
    }
}

#[test]
fn test_sign_up_then_sign_in_scenario() {
    // 注册-登录闭环：a@b.com / password1
    let hasher = PasswordHasher::new();
    let stored = hasher.hash("password1").unwrap();

    assert_ne!(stored, "password1");
    hasher.verify("password1", &stored).unwrap();
    assert!(hasher.verify("wrong", &stored).is_err());
}

#[test]
fn test_password_hasher_default() {
    let hasher1 = PasswordHasher::default();
    let hasher2 = PasswordHasher::new();

    let password = "password1";
    let hash1 = hasher1.hash(password).unwrap();
    let hash2 = hasher2.hash(password).unwrap();

    assert_ne!(hash1, hash2);
    hasher1.verify(password, &hash1).unwrap();
    hasher2.verify(password, &hash2).unwrap();
}
