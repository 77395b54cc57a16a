//! Shared API surface for the echotel example services.
//!
//! Each service lives in a versioned module holding its message types and the
//! fixed procedure path it is served under. Procedures follow the
//! `/<package>.<Service>/<Method>` convention, so clients in any language can
//! address them without generated code.

pub mod ping {
    pub mod v1 {
        use serde::{Deserialize, Serialize};

        pub const SERVICE_NAME: &str = "echotel.ping.v1.PingService";
        pub const PING_PROCEDURE: &str = "/echotel.ping.v1.PingService/Ping";

        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct PingRequest {
            #[serde(default)]
            pub message: String,
        }

        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct PingResponse {
            pub message: String,
        }
    }
}

pub mod greet {
    pub mod v1 {
        use serde::{Deserialize, Serialize};

        pub const SERVICE_NAME: &str = "echotel.greet.v1.GreetService";
        pub const GREET_PROCEDURE: &str = "/echotel.greet.v1.GreetService/Greet";

        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct GreetRequest {
            #[serde(default)]
            pub name: String,
        }

        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct GreetResponse {
            pub message: String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_paths_follow_package_service_method_convention() {
        assert_eq!(
            ping::v1::PING_PROCEDURE,
            format!("/{}/Ping", ping::v1::SERVICE_NAME)
        );
        assert_eq!(
            greet::v1::GREET_PROCEDURE,
            format!("/{}/Greet", greet::v1::SERVICE_NAME)
        );
    }

    #[test]
    fn absent_optional_fields_decode_to_empty() {
        let req: ping::v1::PingRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, "");

        let req: greet::v1::GreetRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.name, "");
    }
}
