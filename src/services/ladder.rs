//! Adaptive placement ladder state machine.
//!
//! Given the ladder level of the quiz just scored and whether the user
//! passed it, decides the next step: conclude at a CEFR level, continue at
//! the next ladder level, or escalate to a supplementary AI-generated test
//! whose pass/fail result resolves the final level.

use crate::domain::models::{AiOutcomes, CefrLevel, LadderLevel, NextAction};

/// Transition function of the placement ladder.
///
/// | level              | passed | action                                   |
/// |--------------------|--------|------------------------------------------|
/// | pre_intermediate   | true   | ContinueTest(intermediate)               |
/// | pre_intermediate   | false  | SetLevel(A1)                             |
/// | intermediate       | true   | ContinueTest(upper_intermediate)         |
/// | intermediate       | false  | SetLevel(A2)                             |
/// | upper_intermediate | true   | ContinueTest(advanced)                   |
/// | upper_intermediate | false  | AiTest(intermediate, pass=B1, fail=A2)   |
/// | advanced           | true   | AiTest(advanced, pass=C1, fail=B2)       |
/// | advanced           | false  | AiTest(upper_intermediate, pass=B2, fail=B1) |
pub fn next_action(level: LadderLevel, passed: bool) -> NextAction {
    match (level, passed) {
        (LadderLevel::PreIntermediate, true) => NextAction::ContinueTest {
            next_level: LadderLevel::Intermediate,
        },
        (LadderLevel::PreIntermediate, false) => NextAction::SetLevel {
            level: CefrLevel::A1,
        },
        (LadderLevel::Intermediate, true) => NextAction::ContinueTest {
            next_level: LadderLevel::UpperIntermediate,
        },
        (LadderLevel::Intermediate, false) => NextAction::SetLevel {
            level: CefrLevel::A2,
        },
        (LadderLevel::UpperIntermediate, true) => NextAction::ContinueTest {
            next_level: LadderLevel::Advanced,
        },
        (LadderLevel::UpperIntermediate, false) => NextAction::AiTest {
            level: LadderLevel::Intermediate,
            outcomes: AiOutcomes {
                pass: CefrLevel::B1,
                fail: CefrLevel::A2,
            },
        },
        (LadderLevel::Advanced, true) => NextAction::AiTest {
            level: LadderLevel::Advanced,
            outcomes: AiOutcomes {
                pass: CefrLevel::C1,
                fail: CefrLevel::B2,
            },
        },
        (LadderLevel::Advanced, false) => NextAction::AiTest {
            level: LadderLevel::UpperIntermediate,
            outcomes: AiOutcomes {
                pass: CefrLevel::B2,
                fail: CefrLevel::B1,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_transition_table() {
        let cases: [(LadderLevel, bool, NextAction); 8] = [
            (
                LadderLevel::PreIntermediate,
                true,
                NextAction::ContinueTest {
                    next_level: LadderLevel::Intermediate,
                },
            ),
            (
                LadderLevel::PreIntermediate,
                false,
                NextAction::SetLevel {
                    level: CefrLevel::A1,
                },
            ),
            (
                LadderLevel::Intermediate,
                true,
                NextAction::ContinueTest {
                    next_level: LadderLevel::UpperIntermediate,
                },
            ),
            (
                LadderLevel::Intermediate,
                false,
                NextAction::SetLevel {
                    level: CefrLevel::A2,
                },
            ),
            (
                LadderLevel::UpperIntermediate,
                true,
                NextAction::ContinueTest {
                    next_level: LadderLevel::Advanced,
                },
            ),
            (
                LadderLevel::UpperIntermediate,
                false,
                NextAction::AiTest {
                    level: LadderLevel::Intermediate,
                    outcomes: AiOutcomes {
                        pass: CefrLevel::B1,
                        fail: CefrLevel::A2,
                    },
                },
            ),
            (
                LadderLevel::Advanced,
                true,
                NextAction::AiTest {
                    level: LadderLevel::Advanced,
                    outcomes: AiOutcomes {
                        pass: CefrLevel::C1,
                        fail: CefrLevel::B2,
                    },
                },
            ),
            (
                LadderLevel::Advanced,
                false,
                NextAction::AiTest {
                    level: LadderLevel::UpperIntermediate,
                    outcomes: AiOutcomes {
                        pass: CefrLevel::B2,
                        fail: CefrLevel::B1,
                    },
                },
            ),
        ];

        for (level, passed, expected) in cases {
            assert_eq!(
                next_action(level, passed),
                expected,
                "level={level} passed={passed}"
            );
        }
    }

    #[test]
    fn test_ai_test_outcomes_resolve() {
        let NextAction::AiTest { outcomes, .. } =
            next_action(LadderLevel::UpperIntermediate, false)
        else {
            panic!("expected AiTest");
        };

        assert_eq!(outcomes.resolve(true), CefrLevel::B1);
        assert_eq!(outcomes.resolve(false), CefrLevel::A2);
    }
}
