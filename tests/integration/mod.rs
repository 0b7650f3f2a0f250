//! Integration tests for the gptwiki lookup tool and batch generator

mod provider_http;
mod test_utils;
mod wiki_lookup;
