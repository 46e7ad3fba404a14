use std::cell::RefCell;

use frame_support::{
    dispatch::DispatchResult,
    parameter_types,
    traits::{ConstU32, ConstU64, GenesisBuild},
    weights::RuntimeDbWeight,
};
use frame_system::EnsureRoot;
use sp_runtime::testing::Header;
use sp_runtime::traits::IdentityLookup;
use sp_runtime::DispatchError;

use sp_core::H256;

use crate as pallet_oracle_consumer;
use crate::prelude::*;

type UncheckedExtrinsic = frame_system::mocking::MockUncheckedExtrinsic<Test>;
type Block = frame_system::mocking::MockBlock<Test>;

frame_support::construct_runtime!(
    pub enum Test where
        Block = Block,
        NodeBlock = Block,
        UncheckedExtrinsic = UncheckedExtrinsic,
    {
        System: frame_system,
        Consumer: pallet_oracle_consumer,
    }
);

parameter_types! {
    pub const TestDbWeight: RuntimeDbWeight = RuntimeDbWeight { read: 1, write: 100 };
}

impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type Origin = Origin;
    type Call = Call;
    type Index = u64;
    type BlockNumber = u64;
    type Hash = H256;
    type Hashing = ::sp_runtime::traits::BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Header = Header;
    type Event = Event;
    type BlockHashCount = ConstU64<250>;
    type DbWeight = TestDbWeight;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = ();
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

pub const MAX_CALLDATA_SIZE: u32 = 256;
pub const MAX_RESULT_SIZE: u32 = 512;
pub const MAX_CHANNEL_ID_LEN: u32 = 64;
pub const REQUEST_TIMEOUT: u64 = 10;

impl pallet_oracle_consumer::Config for Test {
    type Event = Event;
    type Transport = MockTransport;
    type ReportOrigin = EnsureRoot<u64>;
    type MaxCalldataSize = ConstU32<MAX_CALLDATA_SIZE>;
    type MaxResultSize = ConstU32<MAX_RESULT_SIZE>;
    type MaxChannelIdLen = ConstU32<MAX_CHANNEL_ID_LEN>;
    type RequestTimeout = ConstU64<REQUEST_TIMEOUT>;
}

thread_local! {
    static DISPATCHED: RefCell<Vec<(RequestId, OracleRequest<Test>)>> = RefCell::new(vec![]);
    static TRANSPORT_DOWN: RefCell<bool> = RefCell::new(false);
}

/// Records every request it is given, or fails them all while it is down.
pub struct MockTransport;

impl MockTransport {
    pub fn dispatched() -> Vec<(RequestId, OracleRequest<Test>)> {
        DISPATCHED.with(|dispatched| dispatched.borrow().clone())
    }

    pub fn set_down(down: bool) {
        TRANSPORT_DOWN.with(|flag| *flag.borrow_mut() = down);
    }
}

impl OracleTransport<Test> for MockTransport {
    fn dispatch(request_id: RequestId, request: &OracleRequest<Test>) -> DispatchResult {
        if TRANSPORT_DOWN.with(|flag| *flag.borrow()) {
            return Err(DispatchError::Other("channel closed"));
        }
        DISPATCHED.with(|dispatched| {
            dispatched
                .borrow_mut()
                .push((request_id, request.clone()))
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct ExtBuilder {
    latest_request_id: RequestId,
}

impl ExtBuilder {
    pub fn latest_request_id(mut self, latest_request_id: RequestId) -> Self {
        self.latest_request_id = latest_request_id;
        self
    }

    pub fn build(self) -> sp_io::TestExternalities {
        let mut t = frame_system::GenesisConfig::default()
            .build_storage::<Test>()
            .unwrap();
        let config = pallet_oracle_consumer::GenesisConfig {
            latest_request_id: self.latest_request_id,
        };
        <pallet_oracle_consumer::GenesisConfig as GenesisBuild<Test>>::assimilate_storage(
            &config, &mut t,
        )
        .unwrap();
        t.into()
    }

    pub fn build_and_execute(self, test: impl FnOnce() -> ()) {
        self.build().execute_with(|| {
            System::set_block_number(1);
            test()
        })
    }
}
