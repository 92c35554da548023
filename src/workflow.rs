// netpreset - Configuration Workflow
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Validate a selection and apply it to an adapter in three stages.
//!
//! ```text
//! Idle -> Validating -> Rejected
//!                    -> Applying(SetAddress) -> Applying(SetGateway)
//!                       -> Applying(SetDns) -> Done
//! ```
//!
//! Any applying state may end in `Failed(stage)`. Stages already committed
//! stay committed; there is no rollback and no retry.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::models::result::ELEVATION_HINT;
use crate::models::validation::validate;
use crate::models::{ApplySelection, ConfigurationResult, FailureStage, StaticConfigRequest, ValidationError};
use crate::platform::{
    AdapterConfiguration, ConfigurationPlatform, PlatformError, PlatformResult, ReturnCode,
};

/// Cost metric passed with the default gateway.
pub const GATEWAY_METRIC: u16 = 1;

/// One mutation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStage {
    SetAddress,
    SetGateway,
    SetDns,
}

impl ApplyStage {
    fn failure_stage(self) -> FailureStage {
        match self {
            Self::SetAddress => FailureStage::SetAddress,
            Self::SetGateway => FailureStage::SetGateway,
            Self::SetDns => FailureStage::SetDns,
        }
    }
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.failure_stage(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Validating,
    Rejected,
    Applying(ApplyStage),
    Done,
    Failed(FailureStage),
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Done | Self::Failed(_))
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Validation failed; the platform was never touched.
    Rejected(ValidationError),
    /// Validation passed and an apply attempt was made.
    Completed(ConfigurationResult),
}

/// Outcome of a run plus the states it passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    pub outcome: Outcome,
    pub states: Vec<WorkflowState>,
}

impl WorkflowReport {
    pub fn is_success(&self) -> bool {
        matches!(&self.outcome, Outcome::Completed(result) if result.is_success())
    }

    /// Status text for the outcome.
    pub fn message(&self) -> String {
        match &self.outcome {
            Outcome::Rejected(err) => err.to_string(),
            Outcome::Completed(result) => result.message(),
        }
    }
}

/// Single-use apply workflow over a configuration platform.
pub struct Workflow<'a, P: ConfigurationPlatform> {
    platform: &'a P,
    state: WorkflowState,
    states: Vec<WorkflowState>,
}

impl<'a, P: ConfigurationPlatform> Workflow<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self {
            platform,
            state: WorkflowState::Idle,
            states: vec![WorkflowState::Idle],
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!("Workflow: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.states.push(next);
    }

    /// Validate `selection` and, if it passes, apply it.
    pub fn run(mut self, selection: ApplySelection) -> WorkflowReport {
        self.transition(WorkflowState::Validating);

        let outcome = match validate(selection) {
            Ok(request) => Outcome::Completed(self.apply(&request)),
            Err(err) => {
                info!("Selection rejected: {}", err);
                self.transition(WorkflowState::Rejected);
                Outcome::Rejected(err)
            }
        };

        debug_assert!(self.state.is_terminal());
        WorkflowReport {
            outcome,
            states: self.states,
        }
    }

    fn apply(&mut self, request: &StaticConfigRequest) -> ConfigurationResult {
        info!("Applying {} to {}", request.summary(), request.adapter);

        let configurations = match self.platform.configurations() {
            Ok(configurations) => configurations,
            Err(err) => return self.platform_failure(err),
        };

        let Some(config) = configurations
            .iter()
            .find(|c| c.setting_id() == request.adapter.id)
        else {
            warn!("No configuration object for adapter {}", request.adapter.id);
            return self.fail(ConfigurationResult::failure(
                FailureStage::AdapterNotFound,
                request.adapter.id.clone(),
            ));
        };

        debug!(
            "Previous addressing of {}: {:?} / {:?}",
            request.adapter.id,
            config.ip_addresses(),
            config.ip_subnets()
        );

        if let Err(failure) = self.apply_stages(config, request) {
            return failure;
        }

        self.transition(WorkflowState::Done);
        info!("Settings applied to {}", request.adapter.id);
        ConfigurationResult::Success
    }

    fn apply_stages(
        &mut self,
        config: &P::Configuration,
        request: &StaticConfigRequest,
    ) -> Result<(), ConfigurationResult> {
        self.stage(ApplyStage::SetAddress, || {
            config.enable_static(&[request.ip_address], &[request.subnet_mask])
        })?;
        self.stage(ApplyStage::SetGateway, || {
            config.set_gateways(&[request.gateway], &[GATEWAY_METRIC])
        })?;
        self.stage(ApplyStage::SetDns, || {
            config.set_dns_server_search_order(&request.dns_servers)
        })
    }

    fn stage<F>(&mut self, stage: ApplyStage, call: F) -> Result<(), ConfigurationResult>
    where
        F: FnOnce() -> PlatformResult<ReturnCode>,
    {
        self.transition(WorkflowState::Applying(stage));
        match call() {
            Ok(code) if code.is_success() => {
                info!("{}: {}", stage, code);
                Ok(())
            }
            Ok(code) => {
                warn!("{} failed with code {}: {}", stage, code.0, code);
                Err(self.fail(ConfigurationResult::failure(
                    stage.failure_stage(),
                    code.reason(),
                )))
            }
            Err(err) => Err(self.platform_failure(err)),
        }
    }

    fn platform_failure(&mut self, err: PlatformError) -> ConfigurationResult {
        warn!("Platform error: {}", err);
        let result = match err {
            PlatformError::AccessDenied(_) => {
                ConfigurationResult::failure(FailureStage::AccessDenied, ELEVATION_HINT)
            }
            err => ConfigurationResult::failure(FailureStage::Unexpected, err.to_string()),
        };
        self.fail(result)
    }

    fn fail(&mut self, result: ConfigurationResult) -> ConfigurationResult {
        if let Some(stage) = result.failure_stage() {
            self.transition(WorkflowState::Failed(stage));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdapterHandle, AdapterKind, MaskInput};
    use std::cell::RefCell;
    use std::net::Ipv4Addr;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<String>>>;

    #[derive(Clone)]
    struct MockConfig {
        id: String,
        addresses: Vec<String>,
        subnets: Vec<String>,
        codes: [PlatformResult<ReturnCode>; 3],
        calls: CallLog,
    }

    fn join(addrs: &[Ipv4Addr]) -> String {
        addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",")
    }

    impl AdapterConfiguration for MockConfig {
        fn setting_id(&self) -> &str {
            &self.id
        }
        fn ip_addresses(&self) -> &[String] {
            &self.addresses
        }
        fn ip_subnets(&self) -> &[String] {
            &self.subnets
        }
        fn enable_static(&self, addresses: &[Ipv4Addr], masks: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
            self.calls
                .borrow_mut()
                .push(format!("enable_static {} {}", join(addresses), join(masks)));
            self.codes[0].clone()
        }
        fn set_gateways(&self, gateways: &[Ipv4Addr], metrics: &[u16]) -> PlatformResult<ReturnCode> {
            self.calls
                .borrow_mut()
                .push(format!("set_gateways {} {:?}", join(gateways), metrics));
            self.codes[1].clone()
        }
        fn set_dns_server_search_order(&self, servers: &[Ipv4Addr]) -> PlatformResult<ReturnCode> {
            self.calls.borrow_mut().push(format!("set_dns {}", join(servers)));
            self.codes[2].clone()
        }
    }

    struct MockPlatform {
        configs: Vec<MockConfig>,
        enumeration_error: Option<PlatformError>,
        calls: CallLog,
    }

    impl MockPlatform {
        fn with_codes(codes: [PlatformResult<ReturnCode>; 3]) -> Self {
            let calls: CallLog = Rc::default();
            Self {
                configs: vec![MockConfig {
                    id: "eth0".into(),
                    addresses: vec!["192.168.1.20".into()],
                    subnets: vec!["255.255.255.0".into()],
                    codes,
                    calls: Rc::clone(&calls),
                }],
                enumeration_error: None,
                calls,
            }
        }

        fn succeeding() -> Self {
            Self::with_codes([Ok(ReturnCode(0)), Ok(ReturnCode(0)), Ok(ReturnCode(0))])
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl ConfigurationPlatform for MockPlatform {
        type Configuration = MockConfig;

        fn configurations(&self) -> PlatformResult<Vec<MockConfig>> {
            self.calls.borrow_mut().push("configurations".into());
            match &self.enumeration_error {
                Some(err) => Err(err.clone()),
                None => Ok(self.configs.clone()),
            }
        }
    }

    fn selection(adapter_id: &str) -> ApplySelection {
        ApplySelection {
            adapter: Some(AdapterHandle::new(adapter_id, "Intel", AdapterKind::Ethernet)),
            gateway: Some("192.168.1.1".into()),
            dns_servers: Some(vec!["8.8.8.8".into(), "8.8.4.4".into()]),
            ip_address: "192.168.1.50".into(),
            subnet_mask: MaskInput::FromAdapter(Some("255.255.255.0".into())),
        }
    }

    fn result(report: &WorkflowReport) -> &ConfigurationResult {
        match &report.outcome {
            Outcome::Completed(result) => result,
            Outcome::Rejected(err) => panic!("unexpected rejection: {}", err),
        }
    }

    #[test]
    fn test_successful_apply_runs_all_stages_in_order() {
        let platform = MockPlatform::succeeding();
        let report = Workflow::new(&platform).run(selection("eth0"));

        assert!(report.is_success());
        assert_eq!(report.message(), "Settings Saved!");
        assert_eq!(
            platform.calls(),
            vec![
                "configurations",
                "enable_static 192.168.1.50 255.255.255.0",
                "set_gateways 192.168.1.1 [1]",
                "set_dns 8.8.8.8,8.8.4.4",
            ]
        );
        assert_eq!(
            report.states,
            vec![
                WorkflowState::Idle,
                WorkflowState::Validating,
                WorkflowState::Applying(ApplyStage::SetAddress),
                WorkflowState::Applying(ApplyStage::SetGateway),
                WorkflowState::Applying(ApplyStage::SetDns),
                WorkflowState::Done,
            ]
        );
    }

    #[test]
    fn test_rejected_selection_makes_no_platform_calls() {
        for bad in ["999.1.1.1", "", "abc"] {
            let platform = MockPlatform::succeeding();
            let mut s = selection("eth0");
            s.ip_address = bad.into();
            let report = Workflow::new(&platform).run(s);

            assert!(matches!(
                report.outcome,
                Outcome::Rejected(ValidationError::InvalidIpAddress(_))
            ));
            assert_eq!(report.states.last(), Some(&WorkflowState::Rejected));
            assert!(platform.calls().is_empty());
        }

        let platform = MockPlatform::succeeding();
        let mut s = selection("eth0");
        s.adapter = None;
        let report = Workflow::new(&platform).run(s);
        assert_eq!(report.message(), "Please select a network adapter.");
        assert!(platform.calls().is_empty());
    }

    #[test]
    fn test_invalid_mask_stops_after_first_stage() {
        let platform =
            MockPlatform::with_codes([Ok(ReturnCode(3)), Ok(ReturnCode(0)), Ok(ReturnCode(0))]);
        let report = Workflow::new(&platform).run(selection("eth0"));

        assert_eq!(
            result(&report),
            &ConfigurationResult::failure(FailureStage::SetAddress, "Invalid Subnet Mask")
        );
        assert_eq!(platform.calls().len(), 2);
        assert_eq!(
            report.states.last(),
            Some(&WorkflowState::Failed(FailureStage::SetAddress))
        );
    }

    #[test]
    fn test_dns_failure_does_not_roll_back() {
        let platform =
            MockPlatform::with_codes([Ok(ReturnCode(0)), Ok(ReturnCode(0)), Ok(ReturnCode(13))]);
        let report = Workflow::new(&platform).run(selection("eth0"));

        assert_eq!(
            result(&report),
            &ConfigurationResult::failure(FailureStage::SetDns, "Invalid DNSServerSearchOrder")
        );
        assert_eq!(
            report.message(),
            "Failed to set DNS Servers: Invalid DNSServerSearchOrder"
        );
        // configurations + three stages, nothing after
        assert_eq!(platform.calls().len(), 4);
    }

    #[test]
    fn test_unknown_code_reason() {
        let platform =
            MockPlatform::with_codes([Ok(ReturnCode(0)), Ok(ReturnCode(42)), Ok(ReturnCode(0))]);
        let report = Workflow::new(&platform).run(selection("eth0"));
        assert_eq!(
            result(&report),
            &ConfigurationResult::failure(FailureStage::SetGateway, "WMI Return Code: 42")
        );
    }

    #[test]
    fn test_missing_adapter_invokes_no_stage() {
        let platform = MockPlatform::succeeding();
        let report = Workflow::new(&platform).run(selection("wlan9"));

        assert_eq!(
            result(&report),
            &ConfigurationResult::failure(FailureStage::AdapterNotFound, "wlan9")
        );
        assert_eq!(report.message(), crate::models::result::ADAPTER_NOT_FOUND);
        assert!(!report.is_success());
        assert_eq!(platform.calls(), vec!["configurations"]);
        assert_eq!(
            report.states,
            vec![
                WorkflowState::Idle,
                WorkflowState::Validating,
                WorkflowState::Failed(FailureStage::AdapterNotFound),
            ]
        );
    }

    #[test]
    fn test_access_denied_gives_elevation_hint() {
        let platform = MockPlatform::with_codes([
            Err(PlatformError::AccessDenied("not authorized".into())),
            Ok(ReturnCode(0)),
            Ok(ReturnCode(0)),
        ]);
        let report = Workflow::new(&platform).run(selection("eth0"));

        assert_eq!(
            result(&report),
            &ConfigurationResult::failure(FailureStage::AccessDenied, ELEVATION_HINT)
        );
        assert_eq!(platform.calls().len(), 2);
    }

    #[test]
    fn test_enumeration_error_is_unexpected() {
        let mut platform = MockPlatform::succeeding();
        platform.enumeration_error = Some(PlatformError::Unavailable("nmcli not found".into()));
        let report = Workflow::new(&platform).run(selection("eth0"));

        assert_eq!(
            result(&report).failure_stage(),
            Some(FailureStage::Unexpected)
        );
        assert!(report.message().contains("nmcli not found"));
        assert!(report.states.last().is_some_and(WorkflowState::is_terminal));
    }
}
