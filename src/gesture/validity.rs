/// State the classifier exposes when asking whether a single-finger drag may proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragValidityContext {
    pub pressing: bool,
    pub tracked_touches: usize,
}

/// Host policy deciding whether single-finger drag samples are honoured.
pub trait DragValidity {
    fn is_valid_single_drag(&self, ctx: &DragValidityContext) -> bool;
}

impl<F> DragValidity for F
where
    F: Fn(&DragValidityContext) -> bool,
{
    fn is_valid_single_drag(&self, ctx: &DragValidityContext) -> bool {
        self(ctx)
    }
}

/// Touch screens: valid while the device reports at most one contact.
pub struct TouchCountValidity<Q> {
    contact_count: Q,
}

impl<Q> TouchCountValidity<Q>
where
    Q: Fn() -> usize,
{
    /// `contact_count` queries the platform for the current number of raw contacts.
    pub fn new(contact_count: Q) -> Self {
        Self { contact_count }
    }
}

impl<Q> DragValidity for TouchCountValidity<Q>
where
    Q: Fn() -> usize,
{
    fn is_valid_single_drag(&self, _ctx: &DragValidityContext) -> bool {
        (self.contact_count)() <= 1
    }
}

/// Mouse-like single pointer devices: valid while a press is active.
#[derive(Clone, Copy, Debug, Default)]
pub struct PressGatedValidity;

impl DragValidity for PressGatedValidity {
    fn is_valid_single_drag(&self, ctx: &DragValidityContext) -> bool {
        ctx.pressing
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysValid;

impl DragValidity for AlwaysValid {
    fn is_valid_single_drag(&self, _ctx: &DragValidityContext) -> bool {
        true
    }
}
