// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Subnet Allocation and Synthesis
//!
//! Uses proptest to verify the properties that must hold for all valid
//! inputs: allocation never overlaps, synthesis is deterministic, and a
//! failed pass never emits a partial graph.

use proptest::prelude::*;

use topology_synth::domain::{CidrBlock, SubnetAllocator};
use topology_synth::{
    synthesize, Resource, RoutingMode, SubnetSpec, SubnetTier, SynthesisConfig,
};

fn parent_block() -> CidrBlock {
    "10.0.0.0/16".parse().unwrap()
}

/// Mask widths the /16 parent can plausibly be carved into
fn mask_widths() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(16u8..=30, 0..12)
}

fn routing_mode() -> impl Strategy<Value = RoutingMode> {
    prop_oneof![Just(RoutingMode::Isolated), Just(RoutingMode::Forwarding)]
}

/// A demo-shaped config with arbitrary subnet widths and flags
fn arb_config() -> impl Strategy<Value = SynthesisConfig> {
    (
        routing_mode(),
        20u8..=28,
        20u8..=28,
        20u8..=28,
        any::<bool>(),
    )
        .prop_map(|(mode, public, application, appliance, operational_access)| {
            let mut config = SynthesisConfig::demo(mode);
            config.subnet_plan = vec![
                SubnetSpec::new("bastion", SubnetTier::Public, public),
                SubnetSpec::new("application", SubnetTier::RoutablePrivate, application),
                SubnetSpec::new("appliance", mode.required_appliance_tier(), appliance),
            ];
            config.operational_access = operational_access;
            config
        })
}

proptest! {
    /// Property: allocated children never overlap and always lie within
    /// the parent block
    #[test]
    fn prop_allocation_never_overlaps(widths in mask_widths()) {
        let parent = parent_block();
        let mut allocator = SubnetAllocator::new(parent);

        let mut allocated = Vec::new();
        for width in widths {
            match allocator.allocate(width) {
                Ok(block) => allocated.push(block),
                // Exhaustion is a legal outcome; overlap never is.
                Err(_) => break,
            }
        }

        for (i, a) in allocated.iter().enumerate() {
            prop_assert!(parent.contains(a));
            for b in &allocated[..i] {
                prop_assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
    }

    /// Property: allocation is deterministic
    #[test]
    fn prop_allocation_is_deterministic(widths in mask_widths()) {
        let mut first = SubnetAllocator::new(parent_block());
        let mut second = SubnetAllocator::new(parent_block());

        for width in widths {
            prop_assert_eq!(first.allocate(width), second.allocate(width));
        }
    }

    /// Property: synthesizing the same configuration twice yields
    /// structurally equal graphs
    #[test]
    fn prop_synthesis_is_idempotent(config in arb_config()) {
        let first = synthesize(&config);
        let second = synthesize(&config);
        prop_assert_eq!(first, second);
    }

    /// Property: every successful pass emits exactly one network block and
    /// no dangling references
    #[test]
    fn prop_successful_graphs_are_closed(config in arb_config()) {
        if let Ok(graph) = synthesize(&config) {
            let network_blocks = graph
                .iter()
                .filter(|e| matches!(e.resource, Resource::NetworkBlock { .. }))
                .count();
            prop_assert_eq!(network_blocks, 1);

            for entry in graph.iter() {
                for reference in entry.resource.references() {
                    prop_assert!(
                        graph.contains(reference),
                        "{} dangles from {}",
                        reference,
                        entry.id
                    );
                }
            }
        }
    }

    /// Property: an empty plan synthesizes to an empty graph regardless of
    /// the other settings
    #[test]
    fn prop_empty_plan_synthesizes_empty_graph(
        mode in routing_mode(),
        operational_access in any::<bool>(),
    ) {
        let config = SynthesisConfig {
            routing_mode: mode,
            operational_access,
            ..SynthesisConfig::default()
        };

        let graph = synthesize(&config).unwrap();
        prop_assert!(graph.is_empty());
    }
}
