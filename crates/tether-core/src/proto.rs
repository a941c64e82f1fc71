//! # Wire Messages
//!
//! Protobuf messages exchanged between relays, drivers and the trust layer.
//! Field tags match the published interop `.proto` definitions so that views
//! produced by foreign drivers decode unchanged.

pub mod common {
    //! Network-neutral request/response envelopes

    /// Signed request from a remote relay
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Query {
        #[prost(string, repeated, tag = "1")]
        pub policy: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
        #[prost(string, tag = "2")]
        pub address: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub requesting_relay: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub requesting_network: ::prost::alloc::string::String,
        /// PEM certificate of the requestor
        #[prost(string, tag = "5")]
        pub certificate: ::prost::alloc::string::String,
        /// Base64 signature over `address ++ nonce`
        #[prost(string, tag = "6")]
        pub requestor_signature: ::prost::alloc::string::String,
        #[prost(string, tag = "7")]
        pub nonce: ::prost::alloc::string::String,
        #[prost(string, tag = "8")]
        pub request_id: ::prost::alloc::string::String,
        #[prost(string, tag = "9")]
        pub requesting_org: ::prost::alloc::string::String,
        #[prost(bool, tag = "10")]
        pub confidential: bool,
    }

    /// Metadata describing how a view's proof must be checked
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Meta {
        #[prost(enumeration = "meta::Protocol", tag = "1")]
        pub protocol: i32,
        #[prost(string, tag = "2")]
        pub timestamp: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub proof_type: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub serialization_format: ::prost::alloc::string::String,
    }

    /// Nested message and enum types in `Meta`.
    pub mod meta {
        /// Ledger protocol of the network that produced a view
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum Protocol {
            Bitcoin = 0,
            Ethereum = 1,
            Fabric = 3,
            Corda = 4,
        }

        impl Protocol {
            /// String value of the enum field names used in the ProtoBuf definition.
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    Protocol::Bitcoin => "BITCOIN",
                    Protocol::Ethereum => "ETHEREUM",
                    Protocol::Fabric => "FABRIC",
                    Protocol::Corda => "CORDA",
                }
            }
        }
    }

    /// Protocol-specific response plus its proof
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct View {
        #[prost(message, optional, tag = "1")]
        pub meta: ::core::option::Option<Meta>,
        #[prost(bytes = "vec", tag = "2")]
        pub data: ::prost::alloc::vec::Vec<u8>,
    }

    /// Canonical cross-network result envelope
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct InteropPayload {
        #[prost(bytes = "vec", tag = "1")]
        pub payload: ::prost::alloc::vec::Vec<u8>,
        #[prost(string, tag = "2")]
        pub address: ::prost::alloc::string::String,
        #[prost(bool, tag = "3")]
        pub confidential: bool,
        #[prost(string, tag = "4")]
        pub requestor_certificate: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub nonce: ::prost::alloc::string::String,
    }

    /// Encrypted payload plus a keyed digest of the plaintext
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ConfidentialPayload {
        #[prost(bytes = "vec", tag = "1")]
        pub encrypted_payload: ::prost::alloc::vec::Vec<u8>,
        #[prost(enumeration = "confidential_payload::HashType", tag = "2")]
        pub hash_type: i32,
        #[prost(bytes = "vec", tag = "3")]
        pub hash: ::prost::alloc::vec::Vec<u8>,
    }

    /// Nested message and enum types in `ConfidentialPayload`.
    pub mod confidential_payload {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum HashType {
            Hmac = 0,
        }
    }

    /// Plaintext sealed inside a `ConfidentialPayload`
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ConfidentialPayloadContents {
        #[prost(bytes = "vec", tag = "1")]
        pub payload: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub random: ::prost::alloc::vec::Vec<u8>,
    }
}

pub mod peer {
    //! Subset of the Fabric peer protos carried inside Fabric views

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Response {
        #[prost(int32, tag = "1")]
        pub status: i32,
        #[prost(string, tag = "2")]
        pub message: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "3")]
        pub payload: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ProposalResponsePayload {
        #[prost(bytes = "vec", tag = "1")]
        pub proposal_hash: ::prost::alloc::vec::Vec<u8>,
        /// Serialized `ChaincodeAction`
        #[prost(bytes = "vec", tag = "2")]
        pub extension: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeId {
        #[prost(string, tag = "1")]
        pub path: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub version: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeAction {
        #[prost(bytes = "vec", tag = "1")]
        pub results: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub events: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, optional, tag = "3")]
        pub response: ::core::option::Option<Response>,
        #[prost(message, optional, tag = "4")]
        pub chaincode_id: ::core::option::Option<ChaincodeId>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Endorsement {
        /// Serialized `msp::SerializedIdentity` of the endorser
        #[prost(bytes = "vec", tag = "1")]
        pub endorser: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub signature: ::prost::alloc::vec::Vec<u8>,
    }
}

pub mod msp {
    //! Fabric membership service provider identity

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SerializedIdentity {
        #[prost(string, tag = "1")]
        pub mspid: ::prost::alloc::string::String,
        /// PEM certificate bytes
        #[prost(bytes = "vec", tag = "2")]
        pub id_bytes: ::prost::alloc::vec::Vec<u8>,
    }
}

pub mod fabric {
    //! Fabric notarization proof

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FabricView {
        #[prost(message, repeated, tag = "1")]
        pub endorsed_proposal_responses:
            ::prost::alloc::vec::Vec<fabric_view::EndorsedProposalResponse>,
    }

    /// Nested message and enum types in `FabricView`.
    pub mod fabric_view {
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct EndorsedProposalResponse {
            #[prost(message, optional, tag = "1")]
            pub payload: ::core::option::Option<super::super::peer::ProposalResponsePayload>,
            #[prost(message, optional, tag = "2")]
            pub endorsement: ::core::option::Option<super::super::peer::Endorsement>,
        }
    }
}

pub mod corda {
    //! Corda notarization proof

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ViewData {
        #[prost(message, repeated, tag = "1")]
        pub notarizations: ::prost::alloc::vec::Vec<view_data::Notarization>,
        /// Serialized `common::InteropPayload` signed by every notary
        #[prost(bytes = "vec", tag = "2")]
        pub payload: ::prost::alloc::vec::Vec<u8>,
    }

    /// Nested message and enum types in `ViewData`.
    pub mod view_data {
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Notarization {
            /// Base64 signature over the shared payload
            #[prost(string, tag = "1")]
            pub signature: ::prost::alloc::string::String,
            /// PEM certificate of the notary
            #[prost(string, tag = "2")]
            pub certificate: ::prost::alloc::string::String,
            /// Identity the notary claims in the foreign membership
            #[prost(string, tag = "3")]
            pub id: ::prost::alloc::string::String,
        }
    }
}
