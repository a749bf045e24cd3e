//! Coded enumerations
//!
//! OpenNMS encodes most status-like fields as short codes (`"A"`, `"M"`, `1`).
//! Each enumeration carries a fixed lookup table of `(variant, code, label)`;
//! decoding accepts either the code or the label, and anything else is an
//! [`OnmsError::UnknownEnumerationCode`].

use crate::error::OnmsError;
use serde::{Serialize, Serializer};
use std::fmt;

/// An enumeration decoded from a fixed code table
pub trait CodedEnum: Sized + Copy + PartialEq + 'static {
    /// Human-readable kind used in error messages
    const KIND: &'static str;
    /// `(variant, wire code, label)` rows
    const TABLE: &'static [(Self, &'static str, &'static str)];

    /// Resolve a wire code (or label) to a variant
    fn from_code(code: &str) -> Result<Self, OnmsError> {
        Self::TABLE
            .iter()
            .find(|(_, c, label)| *c == code || label.eq_ignore_ascii_case(code))
            .map(|(variant, _, _)| *variant)
            .ok_or_else(|| OnmsError::UnknownEnumerationCode {
                kind: Self::KIND,
                code: code.to_string(),
            })
    }

    /// Wire code for this variant
    fn code(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(variant, _, _)| *variant == self)
            .map(|(_, code, _)| *code)
            .unwrap_or_default()
    }

    fn label(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(variant, _, _)| *variant == self)
            .map(|(_, _, label)| *label)
            .unwrap_or_default()
    }
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $variant:ident => $code:literal, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
        }

        impl CodedEnum for $name {
            const KIND: &'static str = $kind;
            const TABLE: &'static [(Self, &'static str, &'static str)] = &[
                $( ($name::$variant, $code, $label), )+
            ];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

coded_enum! {
    /// How a node's label was chosen
    NodeLabelSource, "node label source" {
        Unknown => " ", "UNKNOWN";
        Address => "A", "ADDRESS";
        Hostname => "H", "HOSTNAME";
        Netbios => "N", "NETBIOS";
        Sysname => "S", "SYSNAME";
        User => "U", "USER";
    }
}

coded_enum! {
    /// Node lifecycle state
    NodeType, "node type" {
        Active => "A", "ACTIVE";
        Deleted => "D", "DELETED";
        Unknown => " ", "UNKNOWN";
    }
}

coded_enum! {
    /// Management state of an IP interface
    ManagedType, "managed type" {
        Managed => "M", "MANAGED";
        Alias => "A", "ALIAS";
        Deleted => "D", "DELETED";
        Unmanaged => "U", "UNMANAGED";
        NotPolled => "N", "NOT_POLLED";
        RemoteOnly => "X", "REMOTE_ONLY";
    }
}

coded_enum! {
    /// SNMP primary flag of an IP interface
    PrimaryType, "primary type" {
        Primary => "P", "PRIMARY";
        Secondary => "S", "SECONDARY";
        NotEligible => "N", "NOT_ELIGIBLE";
    }
}

coded_enum! {
    /// ifAdminStatus / ifOperStatus (RFC 2863)
    SnmpStatus, "SNMP status" {
        Up => "1", "UP";
        Down => "2", "DOWN";
        Testing => "3", "TESTING";
        Unknown => "4", "UNKNOWN";
        Dormant => "5", "DORMANT";
        NotPresent => "6", "NOT_PRESENT";
        LowerLayerDown => "7", "LOWER_LAYER_DOWN";
    }
}

coded_enum! {
    /// Data-collection flag of an SNMP interface
    CollectType, "collect type" {
        Collect => "C", "COLLECT";
        NoCollect => "N", "NO_COLLECT";
        UserCollect => "UC", "USER_COLLECT";
        UserNoCollect => "UN", "USER_NO_COLLECT";
    }
}

coded_enum! {
    /// Polling state of a monitored service
    ServiceStatus, "service status" {
        Managed => "A", "MANAGED";
        Unmanaged => "U", "UNMANAGED";
        Deleted => "D", "DELETED";
        ForcedUnmanaged => "F", "FORCED_UNMANAGED";
        NotMonitored => "N", "NOT_MONITORED";
        RescanToResume => "R", "RESCAN_TO_RESUME";
        RescanToSuspend => "S", "RESCAN_TO_SUSPEND";
        RemotelyMonitored => "X", "REMOTELY_MONITORED";
    }
}

coded_enum! {
    /// Operator feedback on a correlated situation
    FeedbackType, "feedback type" {
        FalsePositive => "FALSE_POSITIVE", "FALSE_POSITIVE";
        FalseNegative => "FALSE_NEGATIVE", "FALSE_NEGATIVE";
        Correct => "CORRECT", "CORRECT";
        Unknown => "UNKNOWN", "UNKNOWN";
    }
}
