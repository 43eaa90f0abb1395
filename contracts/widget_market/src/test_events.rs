extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, Symbol, TryIntoVal,
};

use crate::events::{
    BinMaskUpdated, CatalogEntryAdded, FundsWithdrawn, RoleRegistered, UnitPriceUpdated,
    WidgetSale, WidgetTested,
};
use crate::{MarketConfig, Role, WidgetMarket, WidgetMarketClient};

fn setup() -> (Env, WidgetMarketClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(token_admin).address();
    let contract_id = env.register(
        WidgetMarket,
        (admin.clone(), token.clone(), MarketConfig::standard()),
    );
    let client = WidgetMarketClient::new(&env, &contract_id);
    (env, client, admin, token)
}

#[test]
fn test_role_registered_event() {
    let (env, client, admin, _) = setup();
    let tester = Address::generate(&env);

    client.register_tester(&admin, &tester);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        Symbol::new(&env, "new_tester").into_val(&env),
        tester.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RoleRegistered = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RoleRegistered {
            address: tester.clone(),
            role: Role::Tester,
            registered_by: admin.clone(),
        }
    );
}

#[test]
fn test_catalog_entry_added_event() {
    let (env, client, admin, _) = setup();
    let first = String::from_str(&env, "Factory1 Shanghai");
    let second = String::from_str(&env, "Factory2 Taipei");

    client.add_factory(&admin, &first);
    client.add_factory(&admin, &second);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![&env, Symbol::new(&env, "new_factory").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CatalogEntryAdded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CatalogEntryAdded {
            index: 1,
            count: 2,
            name: second,
        }
    );
}

#[test]
fn test_widget_tested_event() {
    let (env, client, admin, _) = setup();
    let tester = Address::generate(&env);
    client.register_tester(&admin, &tester);
    client.add_factory(&admin, &String::from_str(&env, "Factory1 Shanghai"));
    client.add_factory(&admin, &String::from_str(&env, "Factory2 Taipei"));
    client.add_test_site(&admin, &String::from_str(&env, "TS1 Singapore"));
    client.add_test_site(&admin, &String::from_str(&env, "TS2 Osaka"));

    client.record_widget_tests(&tester, &1234001, &1, &1, &0xFFFF_FFFF);
    client.record_widget_tests(&tester, &1234002, &0, &1, &0xFFFF_1234);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        Symbol::new(&env, "new_tested_widget").into_val(&env),
        2u32.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: WidgetTested = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        WidgetTested {
            serial: 1234002,
            factory: 0,
            test_site: 1,
            results: 0xFFFF_1234,
            widget_count: 2,
            bin: 2,
            bin_count: 1,
        }
    );
}

#[test]
fn test_bin_tuning_events() {
    let (env, client, admin, _) = setup();
    let sales = Address::generate(&env);
    client.register_sales_distributor(&admin, &sales);

    client.update_unit_price(&sales, &1, &200_000_000_000_000_000);
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let price_data: UnitPriceUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        price_data,
        UnitPriceUpdated {
            bin: 1,
            price: 200_000_000_000_000_000,
            sales_distributor: sales.clone(),
        }
    );

    client.update_bin_mask(&sales, &1, &0xFFFF_FFFE);
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        Symbol::new(&env, "new_bin_mask").into_val(&env),
        1u32.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let mask_data: BinMaskUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        mask_data,
        BinMaskUpdated {
            bin: 1,
            mask: 0xFFFF_FFFE,
            sales_distributor: sales.clone(),
        }
    );
}

#[test]
fn test_sale_and_withdrawal_events() {
    let (env, client, admin, token) = setup();
    let tester = Address::generate(&env);
    let customer = Address::generate(&env);
    client.register_tester(&admin, &tester);
    client.register_customer(&admin, &customer);
    client.add_factory(&admin, &String::from_str(&env, "Factory1 Shanghai"));
    client.add_test_site(&admin, &String::from_str(&env, "TS1 Singapore"));
    for serial in 0..3u64 {
        client.record_widget_tests(&tester, &serial, &0, &0, &u32::MAX);
    }

    let price = client.bin_unit_price(&1);
    token::StellarAssetClient::new(&env, &token).mint(&customer, &(price * 3));

    client.buy_widgets(&customer, &1, &2, &(price * 2));
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        Symbol::new(&env, "widget_sale").into_val(&env),
        1u32.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let sale: WidgetSale = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        sale,
        WidgetSale {
            bin: 1,
            quantity: 2,
            customer: customer.clone(),
            total_paid: price * 2,
            first_position: 0,
        }
    );

    client.buy_widgets(&customer, &1, &1, &price);
    let all_events = env.events().all();
    let sale: WidgetSale = all_events
        .last()
        .expect("No events found")
        .2
        .try_into_val(&env)
        .unwrap();
    assert_eq!(sale.first_position, 2);

    client.withdraw_funds(&admin, &price);
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&env, Symbol::new(&env, "funds_withdrawn").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);
    let withdrawn: FundsWithdrawn = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        withdrawn,
        FundsWithdrawn {
            withdrawer: admin.clone(),
            amount: price,
        }
    );
}

#[test]
fn test_emergency_events_carry_admin() {
    let (env, client, admin, _) = setup();

    client.begin_emergency(&admin);
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&env, Symbol::new(&env, "emergency_begun").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);
    let by: Address = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(by, admin);

    client.end_emergency(&admin);
    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![&env, Symbol::new(&env, "emergency_ended").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);
}
