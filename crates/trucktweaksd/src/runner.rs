use trucktweaks_control::{Output, Performer};

pub(crate) struct OutputRunner<'a> {
    performer: &'a mut Performer,
}

impl<'a> OutputRunner<'a> {
    pub fn new(performer: &'a mut Performer) -> Self {
        Self { performer }
    }

    pub fn run(&mut self, output: Output) {
        if let Err(e) = self.performer.perform(&output) {
            log::debug!("failed to perform {output:?}: {e}");
        }
    }
}
