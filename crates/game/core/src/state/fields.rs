use bitflags::bitflags;

bitflags! {
    /// Tracks which fields of a [`MonsterActivation`](super::MonsterActivation)
    /// changed during a state update.
    ///
    /// The persistence collaborator uses this to write back only dirty records.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActivationFields: u8 {
        const STATE        = 1 << 0;
        const LAST_KNOWN   = 1 << 1;
        const TURNS_UNSEEN = 1 << 2;
    }
}
