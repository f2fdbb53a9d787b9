/*
 * Responsibility
 * - store / HTTP に依存しないドメイン処理
 *   - lifecycle: スキーマ同期 + 初回 seed
 *   - checkout: 支払いサマリ・注文の組み立て
 */
pub mod checkout;
pub mod lifecycle;
