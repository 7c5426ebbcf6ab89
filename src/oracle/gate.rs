use watchtower_chain::Address;

use super::{ChainReader, OracleError};

/// Whether `account` may act as an oracle. A non-member is not an error.
pub(crate) async fn is_eligible(
    reader: &dyn ChainReader,
    account: Address,
) -> Result<bool, OracleError> {
    Ok(reader.is_trusted_member(account).await?)
}
