//! Writing verified foreign state into a local application contract

use tether_core::Host;
use tracing::info;

use crate::contract::InteropContract;
use crate::error::{BridgeError, Result};

impl<'h, H: Host + ?Sized> InteropContract<'h, H> {
    /// Verify each view, splice its payload into `application_args` at the
    /// matching index, then invoke `application_function` on the local
    /// application contract.
    ///
    /// `indices`, `addresses`, `b64_views` and `b64_view_contents` run in
    /// parallel; `b64_view_contents[i]` holds the decrypted contents for a
    /// confidential view (empty otherwise).
    #[allow(clippy::too_many_arguments)]
    pub fn write_external_state(
        &self,
        application_id: &str,
        application_channel: &str,
        application_function: &str,
        application_args: &[String],
        indices: &[usize],
        addresses: &[String],
        b64_views: &[String],
        b64_view_contents: &[Vec<String>],
    ) -> Result<Vec<u8>> {
        let expected = addresses.len();
        for (what, found) in [
            ("substitution indices", indices.len()),
            ("views", b64_views.len()),
            ("view contents", b64_view_contents.len()),
        ] {
            if found != expected {
                return Err(BridgeError::ArityMismatch {
                    what,
                    expected,
                    found,
                });
            }
        }

        let mut invocation: Vec<Vec<u8>> = std::iter::once(application_function.as_bytes().to_vec())
            .chain(application_args.iter().map(|a| a.as_bytes().to_vec()))
            .collect();

        for (i, &index) in indices.iter().enumerate() {
            if index >= application_args.len() {
                return Err(BridgeError::IndexOutOfBounds {
                    index,
                    len: application_args.len(),
                });
            }
            let payload =
                self.parse_and_validate_view(&addresses[i], &b64_views[i], &b64_view_contents[i])?;
            invocation[index + 1] = payload;
        }

        let response = self
            .host
            .invoke_chaincode(application_id, &invocation, application_channel);
        if !response.is_ok() {
            return Err(BridgeError::ApplicationInvoke {
                status: response.status,
                message: response.message,
            });
        }

        info!(
            "Wrote {} external view(s) through {}:{}",
            addresses.len(),
            application_id,
            application_function
        );
        Ok(response.payload)
    }
}
