/*
 * Responsibility
 * - ドメインロジック層 (handler と repo の間)
 * - auth: token codec / bearer 検証, policy: owner-or-admin, validation: 入力チェック
 */
pub mod auth;
pub mod policy;
pub mod profile_service;
pub mod validation;
