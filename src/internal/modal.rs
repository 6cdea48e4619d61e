/// The add/edit form overlay. Only one can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(String),
}

impl ModalState {
    pub fn open_create(&mut self) {
        *self = ModalState::OpenForCreate;
    }

    /// Opening for edit from any state just retargets the modal.
    pub fn open_edit(&mut self, id: impl Into<String>) {
        *self = ModalState::OpenForEdit(id.into());
    }

    pub fn close(&mut self) {
        *self = ModalState::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn editing_id(&self) -> Option<&str> {
        match self {
            ModalState::OpenForEdit(id) => Some(id),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModalState::Closed => "",
            ModalState::OpenForCreate => "Add Pot",
            ModalState::OpenForEdit(_) => "Edit Pot",
        }
    }
}

/// A delete waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: String,
    pub name: String,
}

impl DeleteRequest {
    pub fn prompt(&self) -> String {
        format!("Delete \"{}\"? This cannot be undone.", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Cancel,
    Confirm,
}
