// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }
    };
}

entity_id!(ProductId);
entity_id!(UserId);
entity_id!(ActivityId);
entity_id!(NotificationId);
