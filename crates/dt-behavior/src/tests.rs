//! Unit tests for dt-behavior.

use std::rc::Rc;

use dt_agent::{FrameResult, Role, RoleContext};
use dt_core::{AgentId, MessageKind, NodeId, SimClock, Tick, TransportMode};
use dt_spatial::{RoadNetwork, SpatialIndex};

use crate::{ActivityRole, BehaviorModel, Intent, NoopBehavior};

fn ctx<'a>(network: &'a RoadNetwork, aura: &'a SpatialIndex, clock: &'a SimClock) -> RoleContext<'a> {
    RoleContext {
        agent: AgentId(0),
        clock,
        network,
        aura,
    }
}

// ── Intent ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod intent_tests {
    use super::*;

    #[test]
    fn travel_to_fields() {
        let intent = Intent::TravelTo {
            destination: NodeId(7),
            mode: TransportMode::Car,
        };
        match intent {
            Intent::TravelTo { destination, mode } => {
                assert_eq!(destination, NodeId(7));
                assert_eq!(mode, TransportMode::Car);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn wake_at() {
        let intent = Intent::WakeAt(Tick(42));
        assert_eq!(intent, Intent::WakeAt(Tick(42)));
    }

    #[test]
    fn send_message() {
        let intent = Intent::SendMessage {
            to: AgentId(3),
            payload: vec![1, 2, 3],
        };
        match intent {
            Intent::SendMessage { to, payload } => {
                assert_eq!(to, AgentId(3));
                assert_eq!(payload, vec![1, 2, 3]);
            }
            _ => panic!("wrong variant"),
        }
    }
}

// ── NoopBehavior ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod noop_tests {
    use super::*;

    #[test]
    fn on_contacts_returns_empty() {
        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);
        let intents = NoopBehavior.on_contacts(AgentId(0), &[AgentId(1)], &c);
        assert!(intents.is_empty());
    }

    #[test]
    fn on_message_returns_empty() {
        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);
        let intents = NoopBehavior.on_message(AgentId(0), b"hello", &c);
        assert!(intents.is_empty());
    }
}

// ── Custom BehaviorModel ──────────────────────────────────────────────────────

#[cfg(test)]
mod custom_model_tests {
    use super::*;

    /// A behavior that always wants to travel to node 99, on any contact.
    struct AlwaysTravel;

    impl BehaviorModel for AlwaysTravel {
        fn on_contacts(&self, _agent: AgentId, _agents_at_location: &[AgentId], _ctx: &RoleContext<'_>) -> Vec<Intent> {
            vec![Intent::TravelTo {
                destination: NodeId(99),
                mode: TransportMode::Walk,
            }]
        }
    }

    #[test]
    fn custom_model_returns_intent() {
        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);
        let intents = AlwaysTravel.on_contacts(AgentId(0), &[AgentId(0)], &c);
        assert_eq!(intents.len(), 1);
        assert!(matches!(
            intents[0],
            Intent::TravelTo { destination: NodeId(99), mode: TransportMode::Walk }
        ));
    }

    #[test]
    fn model_is_object_safe_via_rc() {
        let model: Rc<dyn BehaviorModel> = Rc::new(AlwaysTravel);
        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);
        let intents = model.on_contacts(AgentId(0), &[], &c);
        assert_eq!(intents.len(), 1);
    }
}

// ── ActivityRole ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod activity_role_tests {
    use super::*;

    #[test]
    fn continues_before_end_tick_and_finishes_at_it() {
        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let mut role = ActivityRole::new(AgentId(0), Tick(5), Rc::new(NoopBehavior));

        let mut clock = SimClock::new(0, 1);
        clock.current_tick = Tick(3);
        let c = ctx(&network, &aura, &clock);
        assert!(matches!(role.frame_tick(&c), FrameResult::Continue));

        clock.current_tick = Tick(5);
        let c = ctx(&network, &aura, &clock);
        assert!(matches!(role.frame_tick(&c), FrameResult::Done));
    }

    #[test]
    fn note_contacts_buffers_intents_from_the_model() {
        struct AlwaysTravel;
        impl BehaviorModel for AlwaysTravel {
            fn on_contacts(&self, _agent: AgentId, _agents: &[AgentId], _ctx: &RoleContext<'_>) -> Vec<Intent> {
                vec![Intent::WakeAt(Tick(10))]
            }
        }

        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);

        let mut role = ActivityRole::new(AgentId(0), Tick(100), Rc::new(AlwaysTravel));
        assert!(role.take_pending_intents().is_empty());

        role.note_contacts(&[AgentId(0), AgentId(1)], &c);
        let drained = role.take_pending_intents();
        assert_eq!(drained, vec![Intent::WakeAt(Tick(10))]);

        // draining again returns nothing until the model reacts again
        assert!(role.take_pending_intents().is_empty());
    }

    #[test]
    fn on_message_feeds_custom_payload_to_the_model_and_buffers_the_result() {
        struct EchoAsMessage;
        impl BehaviorModel for EchoAsMessage {
            fn on_message(&self, _agent: AgentId, payload: &[u8], _ctx: &RoleContext<'_>) -> Vec<Intent> {
                vec![Intent::SendMessage {
                    to: AgentId(payload[0] as u32),
                    payload: payload.to_vec(),
                }]
            }
        }

        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);

        let mut role = ActivityRole::new(AgentId(0), Tick(100), Rc::new(EchoAsMessage));
        role.on_message(&MessageKind::Custom { tag: 1, payload: vec![7] }, &c);

        let drained = role.take_pending_intents();
        assert_eq!(
            drained,
            vec![Intent::SendMessage { to: AgentId(7), payload: vec![7] }]
        );
    }

    #[test]
    fn non_custom_messages_are_ignored() {
        struct PanicsOnMessage;
        impl BehaviorModel for PanicsOnMessage {
            fn on_message(&self, _agent: AgentId, _payload: &[u8], _ctx: &RoleContext<'_>) -> Vec<Intent> {
                panic!("should not be called for a non-Custom message");
            }
        }

        let network = RoadNetwork::empty();
        let aura = SpatialIndex::empty();
        let clock = SimClock::new(0, 1);
        let c = ctx(&network, &aura, &clock);

        let mut role = ActivityRole::new(AgentId(0), Tick(100), Rc::new(PanicsOnMessage));
        role.on_message(&MessageKind::CommsimEnabled { agent: AgentId(0) }, &c);
        assert!(role.take_pending_intents().is_empty());
    }

    #[test]
    fn mode_is_none() {
        let role = ActivityRole::new(AgentId(0), Tick(1), Rc::new(NoopBehavior));
        assert_eq!(role.mode(), TransportMode::None);
    }
}
