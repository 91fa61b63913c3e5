//! Protocol numbers and capacity limits.
//!
//! TLV type numbers are fixed by the NDN packet format (v0.3) and the
//! NDNLPv2 link protocol and MUST NOT be changed. Capacities size the
//! fixed buffers used on the packet path.

// =============================================================================
// TLV TYPES - NDN PACKET FORMAT
// =============================================================================

/// Interest packet.
pub const TT_INTEREST: u64 = 0x05;

/// Data packet.
pub const TT_DATA: u64 = 0x06;

/// Name.
pub const TT_NAME: u64 = 0x07;

/// Generic name component.
pub const TT_GENERIC_NAME_COMPONENT: u64 = 0x08;

/// Interest nonce (4 octets).
pub const TT_NONCE: u64 = 0x0A;

/// InterestLifetime, in milliseconds.
pub const TT_INTEREST_LIFETIME: u64 = 0x0C;

/// MustBeFresh flag (empty value).
pub const TT_MUST_BE_FRESH: u64 = 0x12;

/// ForwardingHint (recognized and skipped).
pub const TT_FORWARDING_HINT: u64 = 0x1E;

/// CanBePrefix flag (empty value).
pub const TT_CAN_BE_PREFIX: u64 = 0x21;

/// Data MetaInfo.
pub const TT_META_INFO: u64 = 0x14;

/// Data Content.
pub const TT_CONTENT: u64 = 0x15;

/// SignatureInfo.
pub const TT_SIGNATURE_INFO: u64 = 0x16;

/// SignatureValue.
pub const TT_SIGNATURE_VALUE: u64 = 0x17;

/// MetaInfo FreshnessPeriod, in milliseconds.
pub const TT_FRESHNESS_PERIOD: u64 = 0x19;

/// SignatureInfo SignatureType.
pub const TT_SIGNATURE_TYPE: u64 = 0x1B;

/// SignatureType value for DigestSha256.
pub const SIGNATURE_DIGEST_SHA256: u64 = 0x00;

// =============================================================================
// TLV TYPES - NDNLPv2
// =============================================================================

/// Link protocol packet.
pub const TT_LP_PACKET: u64 = 0x64;

/// LpPacket fragment (carries a network layer packet).
pub const TT_LP_FRAGMENT: u64 = 0x50;

/// Nack header.
pub const TT_LP_NACK: u64 = 0x0320;

/// NackReason inside a Nack header.
pub const TT_LP_NACK_REASON: u64 = 0x0321;

// =============================================================================
// NAMING CONVENTIONS
// =============================================================================

/// Marker octet prefixing a sequence number component value.
pub const SEQUENCE_MARKER: u8 = 0xFE;

/// Largest encoded sequence number component value (marker + 8 octets).
pub const SEQUENCE_COMPONENT_SIZE: usize = 9;

// =============================================================================
// CAPACITIES
// =============================================================================

/// Largest datagram the face sends or receives.
pub const MAX_PACKET_SIZE: usize = 1024;

/// Handlers a face can dispatch to.
pub const MAX_HANDLERS: usize = 4;

/// Datagrams drained by a single poll of the face.
pub const MAX_PACKETS_PER_POLL: usize = 16;

/// Components in a name.
pub const MAX_NAME_COMPONENTS: usize = 8;

/// Octets in a single name component value.
pub const MAX_COMPONENT_SIZE: usize = 32;

/// Octets of Data content kept after decoding.
pub const MAX_CONTENT_SIZE: usize = 256;

// =============================================================================
// TIMING
// =============================================================================

/// InterestLifetime assumed when the element is absent.
pub const DEFAULT_INTEREST_LIFETIME_MS: u32 = 4000;

/// Probe interval used by `PingConfig::default`.
pub const DEFAULT_PING_INTERVAL_MS: u32 = 5000;
