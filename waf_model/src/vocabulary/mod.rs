// Closed vocabulary of the rule-set configuration API.
//
// Every discrete choice in the domain is a wire enum: a Rust enum whose
// variants map one-to-one onto the upper-snake-case strings the service
// sends, plus an `Unknown(String)` variant that keeps any value this version
// of the model does not recognise. Decoding never fails on an unfamiliar
// string and re-encoding an unknown value writes back exactly what was read.

/// Declares a wire enum together with its string mapping and serde impls.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value not part of this vocabulary, kept verbatim.
            Unknown(String),
        }

        impl $name {
            /// Every wire string this vocabulary knows, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            /// Returns the wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }

            /// Returns true if the value was not recognised when decoded.
            pub fn is_unknown(&self) -> bool {
                matches!(self, $name::Unknown(_))
            }

            /// All known variants, in declaration order.
            pub fn known() -> Vec<Self> {
                vec![$( $name::$variant ),+]
            }
        }

        impl $crate::vocabulary::WireEnum for $name {
            fn as_str(&self) -> &str {
                $name::as_str(self)
            }

            fn is_unknown(&self) -> bool {
                $name::is_unknown(self)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => $name::$variant, )+
                    other => $name::Unknown(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match $name::from(value.as_str()) {
                    $name::Unknown(_) => $name::Unknown(value),
                    known => known,
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok($name::from(raw))
            }
        }
    };
}

/// Common view over every wire enum, used by request validation.
pub trait WireEnum {
    fn as_str(&self) -> &str;
    fn is_unknown(&self) -> bool;
}

mod geo;

pub use geo::GeoMatchConstraintValue;

// ============================================================================
// CHANGE PROTOCOL
// ============================================================================

wire_enum! {
    /// Whether an update envelope adds its value to a container or removes it.
    pub enum ChangeAction {
        Insert => "INSERT",
        Delete => "DELETE",
    }
}

wire_enum! {
    /// Propagation state of a change token.
    ///
    /// PROVISIONED: obtained but not yet used in a mutating call.
    /// PENDING: submitted, still propagating.
    /// INSYNC: propagated everywhere, dependent changes are safe.
    pub enum ChangeTokenStatus {
        Provisioned => "PROVISIONED",
        Pending => "PENDING",
        Insync => "INSYNC",
    }
}

impl ChangeTokenStatus {
    /// Returns true once the change has fully propagated.
    pub fn is_insync(&self) -> bool {
        matches!(self, ChangeTokenStatus::Insync)
    }
}

// ============================================================================
// MATCH VOCABULARY
// ============================================================================

wire_enum! {
    /// Operator used by a size constraint to compare `Size` with the
    /// length of the inspected request part.
    pub enum ComparisonOperator {
        Eq => "EQ",
        Ne => "NE",
        Le => "LE",
        Lt => "LT",
        Ge => "GE",
        Gt => "GT",
    }
}

wire_enum! {
    /// Kind of geographic location a geo constraint refers to.
    pub enum GeoMatchConstraintType {
        Country => "Country",
    }
}

wire_enum! {
    /// Address family of an IP set descriptor.
    pub enum IPSetDescriptorType {
        Ipv4 => "IPV4",
        Ipv6 => "IPV6",
    }
}

wire_enum! {
    /// The part of a web request to inspect.
    pub enum MatchFieldType {
        /// The path that identifies the resource, e.g. `/images/daily-ad.jpg`.
        Uri => "URI",
        /// Everything after the `?` in the URL.
        QueryString => "QUERY_STRING",
        /// A single header, named by `FieldToMatch.Data`.
        Header => "HEADER",
        /// The HTTP method.
        Method => "METHOD",
        /// The first 8192 bytes of the body.
        Body => "BODY",
        /// A single query argument, named by `FieldToMatch.Data`.
        SingleQueryArg => "SINGLE_QUERY_ARG",
        /// Every query argument value.
        AllQueryArgs => "ALL_QUERY_ARGS",
    }
}

impl MatchFieldType {
    /// Returns true if this field type needs `FieldToMatch.Data` to name
    /// the header or query argument.
    pub fn requires_data(&self) -> bool {
        matches!(self, MatchFieldType::Header | MatchFieldType::SingleQueryArg)
    }
}

wire_enum! {
    /// Where in the inspected part the target string must appear.
    pub enum PositionalConstraint {
        Exactly => "EXACTLY",
        StartsWith => "STARTS_WITH",
        EndsWith => "ENDS_WITH",
        Contains => "CONTAINS",
        ContainsWord => "CONTAINS_WORD",
    }
}

wire_enum! {
    /// Normalisation applied to the inspected part before comparison.
    pub enum TextTransformation {
        None => "NONE",
        CompressWhiteSpace => "COMPRESS_WHITE_SPACE",
        HtmlEntityDecode => "HTML_ENTITY_DECODE",
        Lowercase => "LOWERCASE",
        CmdLine => "CMD_LINE",
        UrlDecode => "URL_DECODE",
    }
}

wire_enum! {
    /// Kind of condition set a predicate points at.
    pub enum PredicateType {
        IpMatch => "IPMatch",
        ByteMatch => "ByteMatch",
        SqlInjectionMatch => "SqlInjectionMatch",
        GeoMatch => "GeoMatch",
        SizeConstraint => "SizeConstraint",
        XssMatch => "XssMatch",
        RegexMatch => "RegexMatch",
    }
}

wire_enum! {
    /// Request attribute a rate-based rule aggregates on.
    pub enum RateKey {
        Ip => "IP",
    }
}

// ============================================================================
// ACTIONS AND RULE KINDS
// ============================================================================

wire_enum! {
    /// What to do with a request that matches a rule, or matches no rule
    /// when used as a web ACL default action.
    pub enum WafActionType {
        Block => "BLOCK",
        Allow => "ALLOW",
        Count => "COUNT",
    }
}

wire_enum! {
    /// Override applied to a whole rule group inside a web ACL.
    pub enum WafOverrideActionType {
        None => "NONE",
        Count => "COUNT",
    }
}

wire_enum! {
    /// Kind of rule an activated rule refers to.
    pub enum WafRuleType {
        Regular => "REGULAR",
        RateBased => "RATE_BASED",
        Group => "GROUP",
    }
}

impl Default for WafRuleType {
    fn default() -> Self {
        WafRuleType::Regular
    }
}

// ============================================================================
// ERROR DETAIL VOCABULARY
// ============================================================================

wire_enum! {
    /// Reason a web ACL migration could not be performed.
    pub enum MigrationErrorType {
        EntityNotSupported => "ENTITY_NOT_SUPPORTED",
        EntityNotFound => "ENTITY_NOT_FOUND",
        S3BucketNoPermission => "S3_BUCKET_NO_PERMISSION",
        S3BucketNotAccessible => "S3_BUCKET_NOT_ACCESSIBLE",
        S3BucketNotFound => "S3_BUCKET_NOT_FOUND",
        S3BucketInvalidRegion => "S3_BUCKET_INVALID_REGION",
        S3InternalError => "S3_INTERNAL_ERROR",
    }
}

wire_enum! {
    /// The request field an invalid-parameter error is about.
    pub enum ParameterExceptionField {
        ChangeAction => "CHANGE_ACTION",
        WafAction => "WAF_ACTION",
        WafOverrideAction => "WAF_OVERRIDE_ACTION",
        PredicateType => "PREDICATE_TYPE",
        IpsetType => "IPSET_TYPE",
        ByteMatchFieldType => "BYTE_MATCH_FIELD_TYPE",
        SqlInjectionMatchFieldType => "SQL_INJECTION_MATCH_FIELD_TYPE",
        ByteMatchTextTransformation => "BYTE_MATCH_TEXT_TRANSFORMATION",
        ByteMatchPositionalConstraint => "BYTE_MATCH_POSITIONAL_CONSTRAINT",
        SizeConstraintComparisonOperator => "SIZE_CONSTRAINT_COMPARISON_OPERATOR",
        GeoMatchLocationType => "GEO_MATCH_LOCATION_TYPE",
        GeoMatchLocationValue => "GEO_MATCH_LOCATION_VALUE",
        RateKey => "RATE_KEY",
        RuleType => "RULE_TYPE",
        NextMarker => "NEXT_MARKER",
        ResourceArn => "RESOURCE_ARN",
        Tags => "TAGS",
        TagKeys => "TAG_KEYS",
    }
}

wire_enum! {
    /// Why a parameter was rejected.
    pub enum ParameterExceptionReason {
        InvalidOption => "INVALID_OPTION",
        IllegalCombination => "ILLEGAL_COMBINATION",
        IllegalArgument => "ILLEGAL_ARGUMENT",
        InvalidTagKey => "INVALID_TAG_KEY",
    }
}
